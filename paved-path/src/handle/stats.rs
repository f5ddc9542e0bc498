//! I/O counters for a handle.

/// How much disk work a handle has done.
///
/// Counters only grow; they are never reset by `invalidate`.
///
/// # Examples
///
/// ```no_run
/// use paved_path::PathHandle;
///
/// let mut handle = PathHandle::new("config.json").unwrap();
/// handle.read().unwrap();
/// handle.read().unwrap();
/// assert_eq!(handle.stats().reads, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoStats {
    /// Full reads that populated (or bypassed) the cache.
    pub reads: u64,
    /// Completed atomic writes.
    pub writes: u64,
    /// Stat calls made to compare signatures.
    pub probes: u64,
    /// Reads made only to hash the file during validation.
    pub digests: u64,
}
