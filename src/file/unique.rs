//! Collision-free naming for uploaded files.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use super::entry::split_extension;

/// Candidate path number `n` for `filename` in `folder`.
///
/// `0` is the bare name, `n > 0` inserts `_n` before the extension.
fn candidate(folder: &Path, stem: &str, ext: &str, n: u64) -> PathBuf {
    if n == 0 {
        folder.join(format!("{stem}{ext}"))
    } else {
        folder.join(format!("{stem}_{n}{ext}"))
    }
}

/// Pick a path in `folder` that no entry currently occupies.
///
/// Tries `stem.ext`, then `stem_1.ext`, `stem_2.ext`, and so on.
///
/// This is check-then-use: another writer may create the returned path
/// between this call and the caller's write, in which case one write can
/// overwrite the other. Use [`create_unique`] when that matters.
pub fn reserve(folder: &Path, desired_filename: &str) -> PathBuf {
    let (stem, ext) = split_extension(desired_filename);
    (0..)
        .map(|n| candidate(folder, stem, ext, n))
        .find(|path| path.symlink_metadata().is_err())
        .unwrap_or_else(|| folder.join(desired_filename))
}

/// Atomically claim a free path in `folder` and return it with its open file.
///
/// Walks the same candidates as [`reserve`], but claims each one with an
/// exclusive create, so two concurrent callers never receive the same path.
pub fn create_unique(folder: &Path, desired_filename: &str) -> io::Result<(PathBuf, File)> {
    let (stem, ext) = split_extension(desired_filename);

    for n in 0.. {
        let path = candidate(folder, stem, ext, n);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free file name left",
    ))
}

/// Reduce a client-supplied file name to a safe base name.
///
/// Directory components (either separator) and control characters are
/// dropped. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}
