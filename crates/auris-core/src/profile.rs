use auris_ports::log::PageLog;
use auris_ports::storage::{EngineProfile, ProfileStorage, StorageError};

/// Profile the page talks to the engine with. An unreadable or invalid profile
/// is reported to the page log and the defaults are used instead.
pub fn load_engine_profile(
    storage: &dyn ProfileStorage,
    page_log: &dyn PageLog,
) -> EngineProfile {
    match storage.load_profile().and_then(checked) {
        Ok(profile) => {
            log::info!("engine profile: {}", profile.engine_addr());
            profile
        }
        Err(err) => {
            log::warn!("engine profile unusable, using defaults: {}", err);
            page_log.append(&format!("engine profile unusable, using defaults: {}", err));
            EngineProfile::default()
        }
    }
}

fn checked(profile: EngineProfile) -> Result<EngineProfile, StorageError> {
    profile.validate()?;
    Ok(profile)
}
