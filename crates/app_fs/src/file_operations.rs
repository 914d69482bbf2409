//! File operations module
//! Exclusive create, exclusive copy, no-clobber rename and directory CRUD.
//!
//! New files are always created with `create_new`, so an existing file is
//! never overwritten even when two writers race for the same name.

use crate::{FsError, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Open `path` for writing, failing if anything already exists there
async fn create_new(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path).await
}

/// Remove a file we created but failed to fill
async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!("Failed to remove partial file {}: {}", path.display(), e);
    }
}

/// Check whether anything (file, directory, dangling link) occupies `path`
pub async fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).await.is_ok()
}

/// Write `bytes` to a new file in `dir`, never overwriting.
///
/// `name_for(attempt)` yields the candidate name for attempt 1, 2, 3, ...
/// and must return a different name on every call. Only an
/// "already exists" failure moves on to the next candidate; any other error
/// aborts. Returns the name that was written.
pub async fn write_unique<F>(dir: &Path, mut name_for: F, bytes: &[u8]) -> Result<String>
where
    F: FnMut(u32) -> String,
{
    let mut attempt = 1;
    loop {
        let name = name_for(attempt);
        let target = dir.join(&name);

        match create_new(&target).await {
            Ok(mut file) => {
                let written = async {
                    file.write_all(bytes).await?;
                    file.flush().await
                }
                .await;

                if let Err(e) = written {
                    drop(file);
                    discard(&target).await;
                    return Err(e.into());
                }

                tracing::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
                return Ok(name);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("Name taken, retrying: {}", name);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Copy `source` into `dir` under a fresh name, never overwriting.
///
/// Same naming contract as [`write_unique`]. The destination is claimed
/// with an exclusive create before any data is copied.
pub async fn copy_unique<F>(source: &Path, dir: &Path, mut name_for: F) -> Result<String>
where
    F: FnMut(u32) -> String,
{
    let mut src = File::open(source).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => FsError::NotFound(source.display().to_string()),
        _ => FsError::Io(e),
    })?;

    let mut attempt = 1;
    loop {
        let name = name_for(attempt);
        let target = dir.join(&name);

        match create_new(&target).await {
            Ok(mut dst) => {
                let copied = async {
                    let n = tokio::io::copy(&mut src, &mut dst).await?;
                    dst.flush().await?;
                    Ok::<u64, std::io::Error>(n)
                }
                .await;

                return match copied {
                    Ok(n) => {
                        tracing::debug!("Copied {} bytes: {} -> {}", n, source.display(), target.display());
                        Ok(name)
                    }
                    Err(e) => {
                        drop(dst);
                        discard(&target).await;
                        Err(e.into())
                    }
                };
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("Name taken, retrying: {}", name);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Create a single directory, failing if `path` is already taken
pub async fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(FsError::AlreadyExists(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Rename a directory in place
pub async fn rename_dir(from: &Path, to: &Path) -> Result<()> {
    if !is_occupied(from).await {
        return Err(FsError::NotFound(from.display().to_string()));
    }

    if is_occupied(to).await {
        return Err(FsError::AlreadyExists(to.display().to_string()));
    }

    fs::rename(from, to).await?;
    Ok(())
}

/// Rename a file without ever replacing an existing target.
///
/// Hard-links the file under its new name (which fails atomically when the
/// name is taken) and then unlinks the old name. Filesystems without hard
/// links fall back to check-then-rename, which leaves a narrow window in
/// which a file created by someone else can be replaced. Anything but a
/// regular file at `from` is reported as not found.
pub async fn rename_file(from: &Path, to: &Path) -> Result<()> {
    match fs::symlink_metadata(from).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(FsError::NotFound(from.display().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FsError::NotFound(from.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    match fs::hard_link(from, to).await {
        Ok(()) => {
            if let Err(e) = fs::remove_file(from).await {
                // Roll back so the file doesn't end up under both names
                discard(to).await;
                return Err(e.into());
            }
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(FsError::AlreadyExists(to.display().to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(FsError::NotFound(from.display().to_string()))
        }
        Err(e) if hard_links_unsupported(&e) => {
            tracing::debug!("Hard link unavailable ({}), using plain rename", e);
            rename_checked(from, to).await
        }
        Err(e) => Err(e.into()),
    }
}

/// Errors a filesystem without hard link support reports for a regular file
fn hard_links_unsupported(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::Unsupported | ErrorKind::PermissionDenied | ErrorKind::Other
    )
}

async fn rename_checked(from: &Path, to: &Path) -> Result<()> {
    if is_occupied(to).await {
        return Err(FsError::AlreadyExists(to.display().to_string()));
    }

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(FsError::NotFound(from.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
