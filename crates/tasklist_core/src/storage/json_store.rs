use crate::error::AppError;
use crate::model::Task;
use crate::storage::StoreAdapter;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

/// Encode the collection into the durable payload: a bare JSON array of
/// task records.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string_pretty(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn decode_tasks(payload: &str) -> Result<Vec<Task>, AppError> {
    serde_json::from_str(payload).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// File-backed adapter: one fixed file, each write replaces it in full.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StoreAdapter for FileStore {
    fn read(&self) -> Result<Option<String>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|err| AppError::storage_unavailable(format!("{}: {}", self.path.display(), err)))
    }

    fn write(&self, payload: &str) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| AppError::storage_unavailable(err.to_string()))?;
        }

        std::fs::write(&self.path, payload)
            .map_err(|err| AppError::storage_unavailable(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::storage_unavailable(err.to_string()))?;
        }

        Ok(())
    }
}
