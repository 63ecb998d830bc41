//! Bucket assignment and migration analysis for sharded keys.
//!
//! Identifiers are hashed to 64-bit digests with XXH3, then mapped to one of
//! `n` buckets either with Jump Consistent Hash ([`jump_hash`]) or with plain
//! modulo arithmetic. [`analyze`] measures how many identifiers change bucket
//! when the bucket count changes, which is where the two schemes differ: jump
//! hashing moves about `1/(n+1)` of the keys when a bucket is added, modulo
//! moves about `n/(n+1)` of them.
//!
//! ```
//! use jump_bucketing::{analyze, ConsistentHashing};
//!
//! let ids = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];
//! let result = analyze(&ids, 4, 1, &ConsistentHashing).unwrap();
//! assert_eq!(result.old_table().total(), 10);
//! assert_eq!(result.new_table().total(), 10);
//! assert!(result.moves_needed() <= 10);
//! ```

mod analysis;
mod error;
mod jump;
mod kernel;

pub use analysis::{analyze, expected_move_ratio, DistributionTable, MigrationResult};
pub use error::Error;
pub use jump::jump_hash;
pub use kernel::{
    consistent_bucket, digest, modulo_bucket, Bucketizer, ConsistentHashing, ModuloArithmetic,
};
