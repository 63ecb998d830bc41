use std::fmt;

use xxhash_rust::xxh3::xxh3_64;

use crate::{jump_hash, Error};

/// Hashes an identifier to the 64-bit digest the buckets are computed from.
///
/// This is XXH3 (64 bits, seed 0) over the UTF-8 bytes of `id`, which is
/// stable across runs, platforms and implementations.
#[inline]
pub fn digest(id: &str) -> u64 {
    xxh3_64(id.as_bytes())
}

/// Assigns `id` to one of `num_buckets` buckets with Jump Consistent Hash.
pub fn consistent_bucket(id: &str, num_buckets: u32) -> Result<u32, Error> {
    check_bucket_count(num_buckets)?;
    Ok(jump_hash(digest(id), num_buckets))
}

/// Assigns `id` to one of `num_buckets` buckets by reducing its digest
/// modulo `num_buckets`.
pub fn modulo_bucket(id: &str, num_buckets: u32) -> Result<u32, Error> {
    check_bucket_count(num_buckets)?;
    Ok((digest(id) % u64::from(num_buckets)) as u32)
}

fn check_bucket_count(num_buckets: u32) -> Result<(), Error> {
    if num_buckets == 0 {
        return Err(Error::InvalidBucketCount(num_buckets));
    }
    Ok(())
}

/// A way of assigning identifiers to buckets.
///
/// Implementations must be deterministic: the same identifier and bucket
/// count always give the same bucket, in `0..num_buckets`.
pub trait Bucketizer {
    fn bucket(&self, id: &str, num_buckets: u32) -> Result<u32, Error>;
}

impl<F> Bucketizer for F
where
    F: Fn(&str, u32) -> Result<u32, Error>,
{
    #[inline]
    fn bucket(&self, id: &str, num_buckets: u32) -> Result<u32, Error> {
        self(id, num_buckets)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ConsistentHashing;
impl fmt::Display for ConsistentHashing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Consistent hashing")
    }
}
impl Bucketizer for ConsistentHashing {
    #[inline]
    fn bucket(&self, id: &str, num_buckets: u32) -> Result<u32, Error> {
        consistent_bucket(id, num_buckets)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ModuloArithmetic;
impl fmt::Display for ModuloArithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modulo arithmetic")
    }
}
impl Bucketizer for ModuloArithmetic {
    #[inline]
    fn bucket(&self, id: &str, num_buckets: u32) -> Result<u32, Error> {
        modulo_bucket(id, num_buckets)
    }
}
