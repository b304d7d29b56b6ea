use anyhow::{Context, Result};
use serde_json::Value;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

// Serializes tests that touch process-wide state (environment, working dir).
pub struct ProcessGuard {
    _guard: MutexGuard<'static, ()>,
}

pub fn process_guard() -> ProcessGuard {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let mutex = LOCK.get_or_init(|| Mutex::new(()));
    let guard = mutex.lock().unwrap_or_else(|err| err.into_inner());
    ProcessGuard { _guard: guard }
}

// Sets an environment variable and restores the previous value on drop.
// Callers must hold a `ProcessGuard`.
pub struct EnvVarGuard {
    name: String,
    original: Option<OsString>,
}

impl EnvVarGuard {
    pub fn set(name: &str, value: &str) -> Self {
        let original = env::var_os(name);
        unsafe {
            env::set_var(name, value);
        }
        Self {
            name: name.to_string(),
            original,
        }
    }

    pub fn unset(name: &str) -> Self {
        let original = env::var_os(name);
        unsafe {
            env::remove_var(name);
        }
        Self {
            name: name.to_string(),
            original,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match self.original.take() {
            Some(value) => unsafe { env::set_var(&self.name, value) },
            None => unsafe { env::remove_var(&self.name) },
        }
    }
}

// Switches the working directory and switches back on drop.
// Callers must hold a `ProcessGuard`.
pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    pub fn enter(dir: &Path) -> Result<Self> {
        let original = env::current_dir().context("reading current directory")?;
        env::set_current_dir(dir).with_context(|| format!("entering {}", dir.display()))?;
        Ok(Self { original })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

/// Write `value` as JSON to `name` inside `dir` and return the full path.
pub fn write_json(dir: &TempDir, name: &str, value: &Value) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Write raw text to `name` inside `dir` and return the full path.
pub fn write_text(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
