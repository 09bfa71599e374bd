//! Resolution of client subpaths beneath the served root.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{FileBrowserError, Result};

/// The served root folder.
///
/// Every path handed out by this type is the root itself or one of its
/// descendants, after symlinks are resolved.
#[derive(Debug, Clone)]
pub struct ServedRoot {
    /// Canonical root path.
    root: PathBuf,
}

impl ServedRoot {
    /// Open the served root.
    ///
    /// The path is canonicalized once; it must exist and be a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root)
            .map_err(|e| FileBrowserError::InvalidRoot(format!("{}: {e}", root.display())))?;

        if !canonical.is_dir() {
            return Err(FileBrowserError::InvalidRoot(format!(
                "{}: not a directory",
                root.display()
            )));
        }

        Ok(Self { root: canonical })
    }

    /// Canonical path of the root.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve an existing file or folder beneath the root.
    ///
    /// Containment is checked lexically before touching the filesystem, then
    /// again on the canonical path so that symlinks cannot lead outside.
    /// Escapes fail with [`FileBrowserError::PathEscape`], missing paths with
    /// [`FileBrowserError::NotFound`].
    pub fn resolve(&self, subpath: &str) -> Result<PathBuf> {
        let parts = normalize(subpath)?;
        let candidate = parts
            .iter()
            .fold(self.root.clone(), |path, part| path.join(part));

        let canonical = fs::canonicalize(&candidate).map_err(|e| {
            tracing::debug!("Cannot resolve {}: {}", candidate.display(), e);
            FileBrowserError::NotFound(format!("Path: {subpath}"))
        })?;

        self.ensure_contained(&canonical, subpath)?;
        Ok(canonical)
    }

    /// Resolve a folder beneath the root, creating missing levels.
    ///
    /// Folders are created one level at a time, and each level is checked
    /// for containment before the next is created, so a symlink inside the
    /// tree cannot be used to create folders elsewhere.
    pub fn resolve_or_create_dir(&self, subpath: &str) -> Result<PathBuf> {
        let parts = normalize(subpath)?;
        let mut current = self.root.clone();

        for part in parts {
            let next = current.join(part);
            if !next.exists() {
                match fs::create_dir(&next) {
                    Ok(()) => tracing::info!("Created folder {}", next.display()),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(e.into()),
                }
            }

            current = fs::canonicalize(&next)
                .map_err(|_| FileBrowserError::NotFound(format!("Folder: {subpath}")))?;
            self.ensure_contained(&current, subpath)?;

            if !current.is_dir() {
                return Err(FileBrowserError::NotFound(format!("Folder: {subpath}")));
            }
        }

        Ok(current)
    }

    /// Render a contained path as a `/`-separated subpath ("" for the root).
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default()
    }

    fn ensure_contained(&self, canonical: &Path, subpath: &str) -> Result<()> {
        if canonical.starts_with(&self.root) {
            Ok(())
        } else {
            Err(FileBrowserError::PathEscape(subpath.to_string()))
        }
    }
}

/// Lexically normalize a subpath into its normal components.
///
/// Leading slashes are ignored so URL-style paths work. `.` is dropped and
/// `..` removes the previous component; stepping above the root, or any
/// absolute or prefixed component, is an escape.
fn normalize(subpath: &str) -> Result<Vec<&OsStr>> {
    let trimmed = subpath.trim_start_matches('/');
    let mut parts = Vec::new();

    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(FileBrowserError::PathEscape(subpath.to_string()));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(FileBrowserError::PathEscape(subpath.to_string()));
            }
        }
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_root() -> (TempDir, ServedRoot) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("served/docs")).unwrap();
        fs::write(temp_dir.path().join("served/docs/readme.txt"), b"hello").unwrap();
        fs::write(temp_dir.path().join("secret.txt"), b"top secret").unwrap();
        let root = ServedRoot::new(temp_dir.path().join("served")).unwrap();
        (temp_dir, root)
    }

    #[test]
    fn test_new_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = ServedRoot::new(temp_dir.path().join("missing"));
        assert!(matches!(result, Err(FileBrowserError::InvalidRoot(_))));
    }

    #[test]
    fn test_new_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let result = ServedRoot::new(&file);
        assert!(matches!(result, Err(FileBrowserError::InvalidRoot(_))));
    }

    #[test]
    fn test_resolve_root() {
        let (_temp_dir, root) = setup_root();
        assert_eq!(root.resolve("").unwrap(), root.path());
        assert_eq!(root.resolve("/").unwrap(), root.path());
        assert_eq!(root.resolve(".").unwrap(), root.path());
    }

    #[test]
    fn test_resolve_nested() {
        let (_temp_dir, root) = setup_root();
        let path = root.resolve("docs/readme.txt").unwrap();
        assert_eq!(path, root.path().join("docs").join("readme.txt"));
        assert_eq!(root.relative(&path), "docs/readme.txt");
    }

    #[test]
    fn test_resolve_inner_parent_dir() {
        let (_temp_dir, root) = setup_root();
        let path = root.resolve("docs/../docs/./readme.txt").unwrap();
        assert_eq!(path, root.path().join("docs").join("readme.txt"));
    }

    #[test]
    fn test_resolve_missing() {
        let (_temp_dir, root) = setup_root();
        let result = root.resolve("docs/nothing.txt");
        assert!(matches!(result, Err(FileBrowserError::NotFound(_))));
    }

    #[test]
    fn test_resolve_traversal_is_rejected() {
        let (_temp_dir, root) = setup_root();

        for attempt in [
            "../secret.txt",
            "../../etc/passwd",
            "docs/../../secret.txt",
            "docs/../../../../../../etc/passwd",
            "..",
            "./..",
            "/../secret.txt",
        ] {
            let result = root.resolve(attempt);
            assert!(
                matches!(result, Err(FileBrowserError::PathEscape(_))),
                "{attempt} resolved to {result:?}"
            );
        }
    }

    #[test]
    fn test_resolve_escape_checked_before_existence() {
        let (_temp_dir, root) = setup_root();
        let result = root.resolve("../does-not-exist");
        assert!(matches!(result, Err(FileBrowserError::PathEscape(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_outside_is_rejected() {
        let (temp_dir, root) = setup_root();
        std::os::unix::fs::symlink(
            temp_dir.path().join("secret.txt"),
            root.path().join("leak.txt"),
        )
        .unwrap();

        let result = root.resolve("leak.txt");
        assert!(matches!(result, Err(FileBrowserError::PathEscape(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_inside_is_allowed() {
        let (_temp_dir, root) = setup_root();
        std::os::unix::fs::symlink(root.path().join("docs"), root.path().join("alias")).unwrap();

        let path = root.resolve("alias/readme.txt").unwrap();
        assert_eq!(path, root.path().join("docs").join("readme.txt"));
    }

    #[test]
    fn test_resolve_or_create_dir_existing() {
        let (_temp_dir, root) = setup_root();
        let path = root.resolve_or_create_dir("docs").unwrap();
        assert_eq!(path, root.path().join("docs"));
    }

    #[test]
    fn test_resolve_or_create_dir_creates_levels() {
        let (_temp_dir, root) = setup_root();
        let path = root.resolve_or_create_dir("uploads/2024/jan").unwrap();
        assert!(path.is_dir());
        assert_eq!(root.relative(&path), "uploads/2024/jan");
    }

    #[test]
    fn test_resolve_or_create_dir_rejects_traversal() {
        let (temp_dir, root) = setup_root();
        let result = root.resolve_or_create_dir("../outside");
        assert!(matches!(result, Err(FileBrowserError::PathEscape(_))));
        assert!(!temp_dir.path().join("outside").exists());
    }

    #[test]
    fn test_resolve_or_create_dir_on_file() {
        let (_temp_dir, root) = setup_root();
        let result = root.resolve_or_create_dir("docs/readme.txt");
        assert!(matches!(result, Err(FileBrowserError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_or_create_dir_does_not_follow_escaping_symlink() {
        let (temp_dir, root) = setup_root();
        fs::create_dir(temp_dir.path().join("elsewhere")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("elsewhere"), root.path().join("exit"))
            .unwrap();

        let result = root.resolve_or_create_dir("exit/planted");
        assert!(matches!(result, Err(FileBrowserError::PathEscape(_))));
        assert!(!temp_dir.path().join("elsewhere/planted").exists());
    }

    #[test]
    fn test_relative_of_root_is_empty() {
        let (_temp_dir, root) = setup_root();
        assert_eq!(root.relative(root.path()), "");
    }
}
