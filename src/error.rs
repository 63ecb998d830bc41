/// Errors returned by the bucketing functions.
///
/// Every variant is a precondition violation detected before any work is
/// done, so a failed call never leaves a partially filled result behind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A bucket count of zero was requested.
    #[error("invalid bucket count {0}: the number of buckets must be positive")]
    InvalidBucketCount(u32),

    /// Applying the delta to the old bucket count leaves no bucket, or more
    /// buckets than can be indexed.
    #[error("cannot go from {old_count} buckets with a delta of {delta}")]
    InvalidDelta {
        /// Bucket count before the change.
        old_count: u32,
        /// Requested change in the number of buckets.
        delta: i64,
    },

    /// There is nothing to distribute.
    #[error("no identifiers to analyze")]
    EmptyInput,
}

impl Error {
    /// Whether the error comes from an invalid argument, as opposed to a
    /// runtime failure. All current variants are argument errors.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidBucketCount(_) | Error::InvalidDelta { .. } | Error::EmptyInput
        )
    }
}
