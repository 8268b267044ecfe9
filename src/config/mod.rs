//! TOML-backed run configuration.

use crate::app_dirs;

mod errors;
mod load;
mod types;


pub use errors::ConfigError;
pub use load::{config_path, load_from_path, load_or_default};
pub use types::{DEFAULT_SAMPLE_TEXT, PipelineConfig};

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
