// wallet-core/src/keystore/file.rs
//
// Keystore file I/O
// Ghi atomic: write tmp → fsync → rename, trong cùng thư mục với file đích.

use crate::error::{KeystoreError, WalletError, WalletResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read a keystore file; a missing file is `NotFound`, anything else is `Io`
pub fn read_key_file(path: &Path) -> WalletResult<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => WalletError::Keystore(KeystoreError::NotFound {
            path: path.display().to_string(),
        }),
        _ => io_error("failed to read keystore", path, e),
    })
}

/// Write `content` to `path` atomically
///
/// The destination either keeps its previous content or holds the full new
/// content; a partially written keystore is never observable.
pub fn write_key_file(path: &Path, content: &[u8]) -> WalletResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&parent)?;

    let tmp_path = tmp_path(&parent, path)?;
    {
        let mut file = create_private(&tmp_path)?;
        let written = file
            .write_all(content)
            .and_then(|_| file.sync_all());
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(io_error("failed to write temp keystore", &tmp_path, e));
        }
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("failed to rename temp keystore", path, e)
    })?;

    tracing::debug!(path = %path.display(), "keystore written");
    Ok(())
}

/// Create the keystore directory (0700 on unix) if missing
pub fn ensure_dir(dir: &Path) -> WalletResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|e| io_error("failed to create keystore directory", dir, e))
}

fn create_private(path: &Path) -> WalletResult<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
        .open(path)
        .map_err(|e| io_error("failed to create temp keystore", path, e))
}

fn tmp_path(dir: &Path, path: &Path) -> WalletResult<PathBuf> {
    let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        WalletError::Keystore(KeystoreError::Io(format!(
            "keystore path has no file name: {}",
            path.display()
        )))
    })?;
    Ok(dir.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple())))
}

fn io_error(context: &str, path: &Path, e: std::io::Error) -> WalletError {
    WalletError::Keystore(KeystoreError::Io(format!(
        "{} {}: {}",
        context,
        path.display(),
        e
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("key.json");
        write_key_file(&path, b"{\"a\":1}").unwrap();
        assert_eq!(read_key_file(&path).unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.json");
        write_key_file(&path, b"first").unwrap();
        write_key_file(&path, b"second").unwrap();
        assert_eq!(read_key_file(&path).unwrap(), b"second");

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_key_file(&dir.path().join("absent.json"));
        assert!(matches!(
            result,
            Err(WalletError::Keystore(KeystoreError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_read_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_key_file(dir.path());
        assert!(matches!(
            result,
            Err(WalletError::Keystore(KeystoreError::Io(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let ks_dir = dir.path().join("ks");
        let path = ks_dir.join("key.json");
        write_key_file(&path, b"secret").unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(&ks_dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        assert_eq!(dir_mode, 0o700);
    }
}
