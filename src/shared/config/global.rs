use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::model::{Settings, load_settings};

static LOADED: Lazy<Result<Arc<Settings>, String>> =
    Lazy::new(|| load_settings().map(Arc::new).map_err(|e| e.to_string()));

pub static CONFIG: Lazy<Arc<Settings>> =
    Lazy::new(|| try_config().expect("Failed to load configuration"));

/// The shared settings, or the load error for callers that must not panic.
pub fn try_config() -> Result<Arc<Settings>, String> {
    match &*LOADED {
        Ok(settings) => Ok(Arc::clone(settings)),
        Err(reason) => Err(reason.clone()),
    }
}
