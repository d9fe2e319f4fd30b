//! Configuration System
//!
//! Layered configuration for the provider, the form catalog, the brand voice,
//! history storage and logging. Sources merge in order: built-in defaults,
//! the global config file, a project config file (or an explicit `--config`
//! file), then `CONTENT_AI__SECTION__KEY` environment variables.

use crate::attachment::UnsupportedPolicy;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::provider::ModelProvider;
use crate::types::FormInputs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Application name used for config and data directories.
pub const APP_NAME: &str = "content-ai";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub brand: BrandConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub attachments: AttachmentConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Supported generation back ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Gemini,
    OpenAI,
}

impl ProviderType {
    pub fn slug(self) -> &'static str {
        match self {
            ProviderType::Gemini => "gemini",
            ProviderType::OpenAI => "openai",
        }
    }

    fn default_api_key_env(self) -> &'static str {
        match self {
            ProviderType::Gemini => "GEMINI_API_KEY",
            ProviderType::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Fallback variable checked after the provider-specific one.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Provider connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub provider_type: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Inline API key. Prefer `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Custom endpoint base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::default(),
            model: default_model(),
            api_key: None,
            api_key_env: None,
            endpoint: None,
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "Endpoint must start with http:// or https://: {}",
                    endpoint
                ));
            }
        }
        Ok(())
    }

    /// Resolve the API key: inline value, configured variable, provider default, then `API_KEY`.
    pub fn resolve_api_key(&self) -> Result<String, ApiError> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }
        let primary = self
            .api_key_env
            .clone()
            .unwrap_or_else(|| self.provider_type.default_api_key_env().to_string());
        for var in [primary.as_str(), FALLBACK_API_KEY_ENV] {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    return Ok(key);
                }
            }
        }
        Err(ApiError::ConfigError(format!(
            "API key not set: configure provider.api_key or set {} (or {})",
            primary, FALLBACK_API_KEY_ENV
        )))
    }

    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        self.validate().map_err(ApiError::ConfigError)?;
        let api_key = self.resolve_api_key()?;
        Ok(match self.provider_type {
            ProviderType::Gemini => ModelProvider::Gemini {
                model: self.model.clone(),
                api_key,
                base_url: self.endpoint.clone(),
            },
            ProviderType::OpenAI => ModelProvider::OpenAI {
                model: self.model.clone(),
                api_key,
                base_url: self.endpoint.clone(),
            },
        })
    }
}

/// Closed option sets offered by the form. The first entry of each list is its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_goals")]
    pub goals: Vec<String>,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
    #[serde(default = "default_audiences")]
    pub audiences: Vec<String>,
    #[serde(default = "default_tones")]
    pub tones: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_goals() -> Vec<String> {
    strings(&[
        "Giới thiệu dịch vụ",
        "Quảng bá sản phẩm",
        "Thông báo khuyến mãi",
        "Tin tức sự kiện",
        "Chăm sóc khách hàng",
        "Tuyển dụng",
    ])
}

fn default_platforms() -> Vec<String> {
    strings(&["Facebook", "Zalo", "TikTok", "LinkedIn", "Website", "Email"])
}

fn default_audiences() -> Vec<String> {
    strings(&[
        "Khách hàng cá nhân",
        "Khách hàng doanh nghiệp",
        "Khách hàng trẻ (Gen Z)",
        "Khách hàng cao cấp",
        "Nhà đầu tư",
    ])
}

fn default_tones() -> Vec<String> {
    strings(&[
        "Gần gũi",
        "Chuyên nghiệp",
        "Trang trọng",
        "Trẻ trung",
        "Truyền cảm hứng",
    ])
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            goals: default_goals(),
            platforms: default_platforms(),
            audiences: default_audiences(),
            tones: default_tones(),
        }
    }
}

/// One of the four categorical form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    Goal,
    Platform,
    Audience,
    Tone,
}

impl CatalogField {
    pub const ALL: [CatalogField; 4] = [
        CatalogField::Goal,
        CatalogField::Platform,
        CatalogField::Audience,
        CatalogField::Tone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CatalogField::Goal => "goal",
            CatalogField::Platform => "platform",
            CatalogField::Audience => "audience",
            CatalogField::Tone => "tone",
        }
    }
}

impl CatalogConfig {
    pub fn options(&self, field: CatalogField) -> &[String] {
        match field {
            CatalogField::Goal => &self.goals,
            CatalogField::Platform => &self.platforms,
            CatalogField::Audience => &self.audiences,
            CatalogField::Tone => &self.tones,
        }
    }

    /// Initial form state: empty context and the first option of each list.
    pub fn default_inputs(&self) -> FormInputs {
        let first = |field| {
            self.options(field)
                .first()
                .cloned()
                .unwrap_or_default()
        };
        FormInputs {
            context: String::new(),
            goal: first(CatalogField::Goal),
            platform: first(CatalogField::Platform),
            audience: first(CatalogField::Audience),
            tone: first(CatalogField::Tone),
        }
    }

    /// Check a form value against its option list.
    pub fn check(&self, field: CatalogField, value: &str) -> Result<(), ApiError> {
        let options = self.options(field);
        if options.iter().any(|option| option == value) {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "Unknown {} '{}'. Choose one of: {}",
                field.name(),
                value,
                options.join(", ")
            )))
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for field in CatalogField::ALL {
            if self.options(field).is_empty() {
                return Err(format!("Option list for {} cannot be empty", field.name()));
            }
        }
        Ok(())
    }
}

/// Brand voice directives embedded in every prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandConfig {
    #[serde(default = "default_brand_name")]
    pub name: String,
    #[serde(default = "default_brand_hashtag")]
    pub hashtag: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_brand_name() -> String {
    "BIDV".to_string()
}

fn default_brand_hashtag() -> String {
    "#BIDV".to_string()
}

fn default_language() -> String {
    "Vietnamese".to_string()
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: default_brand_name(),
            hashtag: default_brand_hashtag(),
            language: default_language(),
        }
    }
}

impl BrandConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Brand name cannot be empty".to_string());
        }
        if !self.hashtag.starts_with('#') {
            return Err(format!("Brand hashtag must start with '#': {}", self.hashtag));
        }
        Ok(())
    }
}

/// History storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// sled database directory (default: platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl HistoryConfig {
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().join("history"))
            .ok_or_else(|| {
                ApiError::ConfigError(
                    "Cannot determine a data directory; set history.store_path".to_string(),
                )
            })
    }
}

/// Attachment handling settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentConfig {
    #[serde(default)]
    pub unsupported: UnsupportedPolicy,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String),
    Catalog(String),
    Brand(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
            ValidationError::Brand(msg) => write!(f, "Brand: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }
        if let Err(e) = self.catalog.validate() {
            errors.push(ValidationError::Catalog(e));
        }
        if let Err(e) = self.brand.validate() {
            errors.push(ValidationError::Brand(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one `ConfigError`.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
