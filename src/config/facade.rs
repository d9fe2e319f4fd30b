//! ConfigLoader: assembles sources in merge order and deserializes `AppConfig`.

use super::merge::merge_policy;
use super::sources::{environment, global_file, project_file};
use super::AppConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, project files from `project_dir`, then environment.
    pub fn load(project_dir: &Path) -> Result<AppConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_dir)?;
        let builder = environment::add_to_builder(builder);
        let config: AppConfig = builder.build()?.try_deserialize()?;
        debug!(project_dir = %project_dir.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load defaults, the given file (required), then environment.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        let config: AppConfig = builder.build()?.try_deserialize()?;
        debug!(config_path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Location of the global config file, if one can be determined.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
