use auris_ports::storage::{EngineProfile, ProfileStorage, StorageError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PROFILE_FILE: &str = "engine_profile.json";

pub struct FsProfileStorage {
    path: PathBuf,
}

impl FsProfileStorage {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(PROFILE_FILE))
    }

    /// `<config_dir>/auris/engine_profile.json`
    pub fn in_config_dir() -> Result<Self, StorageError> {
        let config = dirs_next::config_dir()
            .ok_or_else(|| StorageError::Io("no config dir on this platform".to_string()))?;
        Ok(Self::in_dir(&config.join("auris")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: io::Error) -> StorageError {
        StorageError::Io(format!("{}: {}", self.path.display(), err))
    }
}

impl ProfileStorage for FsProfileStorage {
    fn load_profile(&self) -> Result<EngineProfile, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("no engine profile at {}", self.path.display());
                return Ok(EngineProfile::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let profile: EngineProfile = serde_json::from_str(&text).map_err(|err| {
            StorageError::Serde(format!("{} line {}: {}", self.path.display(), err.line(), err))
        })?;
        profile.validate()?;
        Ok(profile)
    }

    // staged next to the target, then renamed over it
    fn save_profile(&self, profile: &EngineProfile) -> Result<(), StorageError> {
        profile.validate()?;
        let json =
            serde_json::to_string_pretty(profile).map_err(|e| StorageError::Serde(e.to_string()))?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let staging = self.path.with_extension("json.partial");
        fs::write(&staging, json).map_err(|e| self.io_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))
    }
}
