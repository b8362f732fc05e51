//! Advisory locking of the installation root
//!
//! Mutating commands hold an [`InstallGuard`] for their whole run. A second
//! tresor process against the same root fails fast with
//! [`TresorError::Locked`] instead of racing on the same directories.

use std::path::Path;

use fslock::LockFile;

use crate::error::{Result, TresorError};
use crate::layout::LOCK_FILE;
use crate::ui::log;

/// RAII guard for the installation lock
///
/// Released on drop; the OS releases it if the process dies. The lock file
/// itself stays in place so every process locks the same inode.
pub struct InstallGuard {
    lock: LockFile,
}

impl InstallGuard {
    /// Try to lock `root` without blocking
    pub fn acquire(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TresorError::NotInstalled {
                path: root.display().to_string(),
            });
        }

        let lock_path = root.join(LOCK_FILE);
        let mut lock = LockFile::open(&lock_path).map_err(|e| TresorError::LockFailed {
            reason: format!("Failed to open lock file: {e}"),
        })?;

        let acquired = lock.try_lock().map_err(|e| TresorError::LockFailed {
            reason: format!("Failed to try lock: {e}"),
        })?;

        if acquired {
            log::debug(format!("Locked {}", lock_path.display()));
            Ok(Self { lock })
        } else {
            Err(TresorError::Locked)
        }
    }
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_and_release() {
        let temp = TempDir::new().unwrap();
        {
            let _guard = InstallGuard::acquire(temp.path()).unwrap();
            assert!(temp.path().join(LOCK_FILE).exists());
        }
        let _again = InstallGuard::acquire(temp.path()).unwrap();
    }

    #[test]
    fn test_lock_file_outlives_guard() {
        let temp = TempDir::new().unwrap();
        let guard = InstallGuard::acquire(temp.path()).unwrap();
        let mut early = LockFile::open(&temp.path().join(LOCK_FILE)).unwrap();
        drop(guard);

        assert!(temp.path().join(LOCK_FILE).exists());
        assert!(early.try_lock().unwrap());
        let second = InstallGuard::acquire(temp.path());
        assert!(matches!(second, Err(TresorError::Locked)));
    }

    #[test]
    fn test_second_acquire_is_locked() {
        let temp = TempDir::new().unwrap();
        let _guard = InstallGuard::acquire(temp.path()).unwrap();
        let second = InstallGuard::acquire(temp.path());
        assert!(matches!(second, Err(TresorError::Locked)));
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = InstallGuard::acquire(&temp.path().join("missing"));
        assert!(matches!(result, Err(TresorError::NotInstalled { .. })));
    }
}
