use serde::{Deserialize, Serialize};

fn default_engine_host() -> String {
    "127.0.0.1".to_string()
}

fn default_engine_port() -> u16 {
    8000
}

fn default_bind_addr() -> String {
    "0.0.0.0:0".to_string()
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Host-specific action ids. The defaults are Reaper's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCodes {
    pub mute_all: i32,
    pub unselect_all: i32,
    pub toggle_mute_selected: i32,
    pub loop_on: i32,
    pub loop_off: i32,
    pub loop_start_marker: i32,
    pub loop_end_marker: i32,
    pub solo_track: i32,
    pub unsolo_all: i32,
}

impl Default for ActionCodes {
    fn default() -> Self {
        Self {
            mute_all: 40339,
            unselect_all: 40297,
            toggle_mute_selected: 6,
            loop_on: 1068,
            loop_off: 1068,
            loop_start_marker: 40222,
            loop_end_marker: 40223,
            solo_track: 7,
            unsolo_all: 40340,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineProfile {
    #[serde(default = "default_engine_host")]
    pub engine_host: String,
    #[serde(default = "default_engine_port")]
    pub engine_port: u16,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub actions: ActionCodes,
}

impl Default for EngineProfile {
    fn default() -> Self {
        Self {
            engine_host: default_engine_host(),
            engine_port: default_engine_port(),
            bind_addr: default_bind_addr(),
            actions: ActionCodes::default(),
        }
    }
}

impl ActionCodes {
    pub fn named(&self) -> [(&'static str, i32); 9] {
        [
            ("mute_all", self.mute_all),
            ("unselect_all", self.unselect_all),
            ("toggle_mute_selected", self.toggle_mute_selected),
            ("loop_on", self.loop_on),
            ("loop_off", self.loop_off),
            ("loop_start_marker", self.loop_start_marker),
            ("loop_end_marker", self.loop_end_marker),
            ("solo_track", self.solo_track),
            ("unsolo_all", self.unsolo_all),
        ]
    }
}

impl EngineProfile {
    pub fn engine_addr(&self) -> String {
        format!("{}:{}", self.engine_host, self.engine_port)
    }

    // Action ids are positive in every host we drive.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.engine_host.trim().is_empty() {
            return Err(StorageError::Invalid("engine_host is empty".to_string()));
        }
        if self.engine_port == 0 {
            return Err(StorageError::Invalid("engine_port is 0".to_string()));
        }
        for (name, code) in self.actions.named() {
            if code <= 0 {
                return Err(StorageError::Invalid(format!(
                    "action {} has code {}",
                    name, code
                )));
            }
        }
        Ok(())
    }
}

pub trait ProfileStorage: Send + Sync {
    fn load_profile(&self) -> Result<EngineProfile, StorageError>;
    fn save_profile(&self, profile: &EngineProfile) -> Result<(), StorageError>;
}
