use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use sentiment::app_dirs::{APP_DIR_NAME, CONFIG_FILE_NAME, CONFIG_HOME_ENV};
use tempfile::TempDir;

static CONFIG_HOME_LOCK: Mutex<()> = Mutex::new(());

/// A throwaway config base directory, exported through `SENTIMENT_CONFIG_HOME`
/// until dropped. Tests holding one run one at a time.
pub struct ConfigHome {
    dir: TempDir,
    previous: Option<String>,
    _lock: MutexGuard<'static, ()>,
}

impl ConfigHome {
    pub fn new() -> Self {
        let lock = CONFIG_HOME_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = tempfile::tempdir().expect("config home tempdir");
        let previous = std::env::var(CONFIG_HOME_ENV).ok();
        // SAFETY: every writer of this variable holds CONFIG_HOME_LOCK.
        unsafe { std::env::set_var(CONFIG_HOME_ENV, dir.path()) };
        Self {
            dir,
            previous,
            _lock: lock,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where `load_or_default(None)` looks for its file.
    pub fn config_file(&self) -> PathBuf {
        self.dir.path().join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    pub fn write_config(&self, toml: &str) -> PathBuf {
        let path = self.config_file();
        std::fs::create_dir_all(path.parent().expect("config parent")).expect("create app dir");
        std::fs::write(&path, toml).expect("write config");
        path
    }
}

impl Drop for ConfigHome {
    fn drop(&mut self) {
        // SAFETY: CONFIG_HOME_LOCK is still held by `_lock`.
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(CONFIG_HOME_ENV, value),
                None => std::env::remove_var(CONFIG_HOME_ENV),
            }
        }
    }
}
