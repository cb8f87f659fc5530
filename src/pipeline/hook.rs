use std::path::{Path, PathBuf};

use anyhow::Result;

/// A hook invoked between sealing and reopening a photo in a [`roundtrip`](super::roundtrip).
///
/// Stands in for whatever happens to a sealed photo after it leaves the codec:
/// publishing it to object storage and fetching it back, re-encoding it in
/// another container, and so on. The roundtrip reports whether the payload
/// survived.
///
/// # Example
///
/// ```rust
/// use std::path::{Path, PathBuf};
/// use anyhow::Result;
/// use snapseal::PipelineHook;
///
/// struct BucketHook;
///
/// impl PipelineHook for BucketHook {
///     fn after_seal(&self, sealed_path: &Path) -> Result<PathBuf> {
///         // upload sealed_path, download the published copy,
///         // return where the copy landed locally
///         Ok(sealed_path.to_path_buf())
///     }
/// }
/// ```
pub trait PipelineHook {
    /// Called once the sealed PNG is on disk. Returns the path to reopen.
    fn after_seal(&self, sealed_path: &Path) -> Result<PathBuf>;
}

/// Reopens the sealed file exactly where it was written.
pub struct NoopHook;

impl PipelineHook for NoopHook {
    fn after_seal(&self, sealed_path: &Path) -> Result<PathBuf> {
        Ok(sealed_path.to_path_buf())
    }
}
