use std::path::{Path, PathBuf};

/// Errors surfaced by a user-supplied [`IncludeProvider`].
pub type BoxedIncludeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical identity of an include file; the preprocessor's de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedIncludePath(pub PathBuf);

/// User-supplied include resolver and reader.
///
/// Custom implementations enable virtual file systems, include search paths,
/// and dependency tracking by build systems.
pub trait IncludeProvider {
    /// Resolve a directive path against the directory of the including file.
    fn resolve(
        &self,
        path: &str,
        from_dir: &Path,
    ) -> Result<ResolvedIncludePath, BoxedIncludeError>;

    /// Read the source text behind a previously resolved path.
    fn read(&mut self, path: &ResolvedIncludePath) -> Result<String, BoxedIncludeError>;
}

/// Include provider backed by the file system.
///
/// Paths resolve relative to the including file's directory and are
/// canonicalized, so the same header reached through different relative
/// spellings de-duplicates to one absolute identity.
pub struct FsIncludeProvider;

impl IncludeProvider for FsIncludeProvider {
    fn resolve(
        &self,
        path: &str,
        from_dir: &Path,
    ) -> Result<ResolvedIncludePath, BoxedIncludeError> {
        Ok(ResolvedIncludePath(from_dir.join(path).canonicalize()?))
    }

    fn read(&mut self, path: &ResolvedIncludePath) -> Result<String, BoxedIncludeError> {
        Ok(std::fs::read_to_string(&path.0)?)
    }
}
