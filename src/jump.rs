//! Jump Consistent Hash, from "A Fast, Minimal Memory, Consistent Hash
//! Algorithm" by John Lamping and Eric Veach (2014).

/// Multiplier of the 64-bit linear congruential generator driving the jumps.
const LCG_MULTIPLIER: u64 = 2862933555777941757;

/// Maps `key` to a bucket in `0..num_buckets`.
///
/// Growing `num_buckets` by one relocates an expected `1 / (num_buckets + 1)`
/// of the keys, all of them to the new bucket.
///
/// The key is advanced with a wrapping LCG step and the next candidate
/// bucket is derived through an `f64` division. Both must stay as they are
/// for the output to match other implementations bit for bit; the float
/// division may in theory round differently on platforms without IEEE 754
/// doubles.
///
/// `num_buckets` must be positive.
///
/// ```
/// use jump_bucketing::jump_hash;
///
/// assert_eq!(jump_hash(0, 1), 0);
/// assert_eq!(jump_hash(42, 10), 2);
/// ```
#[inline]
pub fn jump_hash(key: u64, num_buckets: u32) -> u32 {
    debug_assert!(num_buckets > 0);
    let mut k = key;
    let (mut b, mut j) = (-1_i64, 0_i64);
    while j < i64::from(num_buckets) {
        b = j;
        k = k.wrapping_mul(LCG_MULTIPLIER).wrapping_add(1);
        j = ((b + 1) as f64 * (f64::from(1_u32 << 31) / ((k >> 33) + 1) as f64)) as i64;
    }
    b as u32
}
