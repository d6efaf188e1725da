//! Guards for tests that touch process-global state.
//!
//! Environment variables and the working directory are shared by every test
//! thread, so tests that change either must hold [`ENV_LOCK`]. The file has
//! no crate-internal imports so integration tests can include it by path.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes tests that depend on the environment or the working directory.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Take [`ENV_LOCK`], ignoring poisoning left behind by a failed test.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets one environment variable and puts the old value back on drop.
pub struct EnvVarGuard {
    name: OsString,
    saved: Option<OsString>,
}

impl EnvVarGuard {
    #[allow(unsafe_code)]
    pub fn set(name: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        let name = name.as_ref().to_os_string();
        let saved = env::var_os(&name);
        // SAFETY: callers hold ENV_LOCK, so no other test thread reads the environment.
        unsafe { env::set_var(&name, value) };
        Self { name, saved }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: see `EnvVarGuard::set`.
        match self.saved.take() {
            Some(value) => unsafe { env::set_var(&self.name, value) },
            None => unsafe { env::remove_var(&self.name) },
        }
    }
}

/// Enters a directory and returns to the previous one on drop.
pub struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Self {
        let previous = env::current_dir().unwrap();
        env::set_current_dir(dir).unwrap();
        Self { previous }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}
