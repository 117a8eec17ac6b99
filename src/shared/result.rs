/// Type alias for Result with anyhow::Error as the error type.
/// Used across the crate except where an operation is total by contract
/// (lockfile parsing, enrichment runs).
pub type Result<T> = std::result::Result<T, anyhow::Error>;
