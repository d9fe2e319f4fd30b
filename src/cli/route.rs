//! CLI route: single route table and run context. Dispatches to the controller,
//! the history store and presentation.

use crate::attachment::Attachment;
use crate::config::{AppConfig, CatalogField, ConfigLoader};
use crate::controller::{Controller, SubmitOutcome};
use crate::error::ApiError;
use crate::history::{HistoryStorage, HistoryStore, SledHistoryStorage};
use crate::provider::{ModelProviderClient, ProviderFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cli::command_name;
use crate::cli::parse::{Commands, ConfigCommands, HistoryCommands};
use crate::cli::presentation::{
    format_generation_result_json, format_generation_result_text, format_history_entry_json,
    format_history_entry_text, format_history_list_json, format_history_list_text,
    format_options_json, format_options_text,
};

/// Runtime context for CLI execution: effective configuration plus optional
/// pre-built collaborators. Storage and the provider client are opened on
/// first use so read-only commands never need an API key.
pub struct RunContext {
    config: AppConfig,
    storage: Option<Arc<dyn HistoryStorage>>,
    provider: Option<Arc<dyn ModelProviderClient>>,
}

impl RunContext {
    /// Create run context from a project directory and optional config path. Uses ConfigLoader only.
    pub fn new(project_dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_dir)?
        };
        Ok(Self::with_parts(config, None, None))
    }

    /// Create run context from already-built parts.
    pub fn with_parts(
        config: AppConfig,
        storage: Option<Arc<dyn HistoryStorage>>,
        provider: Option<Arc<dyn ModelProviderClient>>,
    ) -> Self {
        Self {
            config,
            storage,
            provider,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = %name, "Executing command");
        let result = self.execute_inner(command);
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(command = %name, duration_ms, "Command completed"),
            Err(e) => warn!(command = %name, duration_ms, error = %e, "Command failed"),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generate {
                context,
                file,
                goal,
                platform,
                audience,
                tone,
                format,
            } => self.handle_generate(
                context,
                file.as_deref(),
                [goal, platform, audience, tone],
                format,
            ),
            Commands::History { command } => self.handle_history_command(command),
            Commands::Options { format } => {
                if format == "json" {
                    format_options_json(&self.config.catalog)
                } else {
                    Ok(format_options_text(&self.config.catalog))
                }
            }
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn handle_generate(
        &self,
        context: &str,
        file: Option<&Path>,
        selections: [&Option<String>; 4],
        format: &str,
    ) -> Result<String, ApiError> {
        let catalog = &self.config.catalog;
        let mut form = catalog.default_inputs();
        form.context = context.to_string();

        let [goal, platform, audience, tone] = selections;
        let slots = [
            (CatalogField::Goal, goal, &mut form.goal),
            (CatalogField::Platform, platform, &mut form.platform),
            (CatalogField::Audience, audience, &mut form.audience),
            (CatalogField::Tone, tone, &mut form.tone),
        ];
        for (field, selected, slot) in slots {
            if let Some(value) = selected {
                catalog.check(field, value)?;
                *slot = value.clone();
            }
        }

        Controller::check_submittable(&form.context, file.is_some())?;
        let mut controller = self.controller(self.history()?)?;
        controller.set_form(form);
        if let Some(path) = file {
            controller.attach(Attachment::from_path(path));
        }
        self.submit(&mut controller, format, None)
    }

    fn handle_history_command(&self, command: &HistoryCommands) -> Result<String, ApiError> {
        match command {
            HistoryCommands::List { format, limit } => {
                let store = self.history()?;
                let entries = store.entries();
                let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];
                if format == "json" {
                    format_history_list_json(shown, entries.len())
                } else {
                    Ok(format_history_list_text(shown, entries.len()))
                }
            }
            HistoryCommands::Show { id, format } => {
                let store = self.history()?;
                let entry = store
                    .get(id)
                    .ok_or_else(|| ApiError::EntryNotFound(id.clone()))?;
                if format == "json" {
                    format_history_entry_json(entry)
                } else {
                    Ok(format_history_entry_text(entry))
                }
            }
            HistoryCommands::Delete { id } => {
                let mut store = self.history()?;
                if store.delete(id) {
                    Ok(format!("Deleted history entry {}", id))
                } else {
                    warn!(id = %id, "No history entry to delete");
                    Ok(format!("No history entry with id {}; nothing deleted", id))
                }
            }
            HistoryCommands::Clear { yes } => self.handle_history_clear(*yes),
            HistoryCommands::Reuse { id, file, format } => {
                let store = self.history()?;
                let entry = store
                    .get(id)
                    .ok_or_else(|| ApiError::EntryNotFound(id.clone()))?;
                Controller::check_submittable(&entry.inputs.form.context, file.is_some())?;
                let mut controller = self.controller(store)?;
                let reused = controller.apply_reuse(id)?;
                let note = match (&reused.file_name, file) {
                    (Some(name), None) => {
                        warn!(
                            id = %id,
                            file_name = %name,
                            "Original attachment is not stored in history"
                        );
                        Some(format!(
                            "Note: the original attachment {} is not stored in history and was not re-attached.",
                            name
                        ))
                    }
                    _ => None,
                };
                if let Some(path) = file {
                    controller.attach(Attachment::from_path(path));
                }
                self.submit(&mut controller, format, note)
            }
        }
    }

    fn handle_history_clear(&self, yes: bool) -> Result<String, ApiError> {
        let mut store = self.history()?;
        if store.is_empty() {
            return Ok("History is already empty.".to_string());
        }
        let count = store.len();
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete all {} history entries?", count))
                .default(false)
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Clear cancelled".to_string());
            }
        }
        store.clear();
        Ok(format!("Cleared {} history entries", count))
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => {
                let mut shown = self.config.clone();
                if shown.provider.api_key.is_some() {
                    shown.provider.api_key = Some("<redacted>".to_string());
                }
                toml::to_string_pretty(&shown).map_err(|e| {
                    ApiError::ConfigError(format!("Failed to render configuration: {}", e))
                })
            }
            ConfigCommands::Validate => {
                self.config.ensure_valid()?;
                let key_status = match self.config.provider.resolve_api_key() {
                    Ok(_) => "set".to_string(),
                    Err(e) => e.user_message(),
                };
                Ok(format!(
                    "Configuration is valid.\n  Provider: {} ({})\n  API key: {}",
                    self.config.provider.provider_type.slug(),
                    self.config.provider.model,
                    key_status
                ))
            }
        }
    }

    fn submit(
        &self,
        controller: &mut Controller,
        format: &str,
        note: Option<String>,
    ) -> Result<String, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                ApiError::ConfigError(format!("Failed to create async runtime: {}", e))
            })?;
        match runtime.block_on(controller.submit())? {
            SubmitOutcome::Generated(result) => {
                let id = controller.history().entries().first().map(|e| e.id.as_str());
                if format == "json" {
                    format_generation_result_json(id, &result)
                } else {
                    Ok(format_generation_result_text(&result, note.as_deref()))
                }
            }
            SubmitOutcome::Busy => Err(ApiError::GenerationFailed(
                "a generation is already in progress".to_string(),
            )),
        }
    }

    fn controller(&self, history: HistoryStore) -> Result<Controller, ApiError> {
        self.config.ensure_valid()?;
        let provider = self.provider_client()?;
        Ok(Controller::with_history(&self.config, provider, history))
    }

    fn history(&self) -> Result<HistoryStore, ApiError> {
        Ok(HistoryStore::load(self.history_storage()?))
    }

    fn history_storage(&self) -> Result<Arc<dyn HistoryStorage>, ApiError> {
        if let Some(storage) = &self.storage {
            return Ok(Arc::clone(storage));
        }
        let path = self.config.history.resolve_store_path()?;
        debug!(path = %path.display(), "Opening history store");
        Ok(Arc::new(SledHistoryStorage::open(&path)?))
    }

    fn provider_client(&self) -> Result<Arc<dyn ModelProviderClient>, ApiError> {
        if let Some(provider) = &self.provider {
            return Ok(Arc::clone(provider));
        }
        let provider = self.config.provider.to_model_provider()?;
        Ok(Arc::from(ProviderFactory::create_client(&provider)?))
    }
}
