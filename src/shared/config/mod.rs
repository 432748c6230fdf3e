pub mod global;
pub mod model;

pub use global::{CONFIG, try_config};
pub use model::{CodecConfig, LoggingConfig, Settings, load_settings};
