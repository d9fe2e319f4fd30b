//! Integration tests for Configuration System

use super::test_utils::with_isolated_env;
use content_ai::attachment::UnsupportedPolicy;
use content_ai::config::{AppConfig, ConfigLoader, ProviderType};
use content_ai::error::ApiError;
use content_ai::prompt::{GenerationRequest, PromptBuilder};
use content_ai::provider::ModelProvider;

const FILE_CONFIG: &str = r##"
[provider]
provider_type = "openai"
model = "gpt-4o-mini"
api_key = "sk-inline"
endpoint = "http://localhost:8080/v1"

[catalog]
platforms = ["Instagram", "Threads"]

[brand]
name = "Acme Bank"
hashtag = "#Acme"
language = "English"

[attachments]
unsupported = "reject"

[logging]
level = "info"
"##;

#[test]
fn test_file_config_drives_provider_catalog_and_prompt() {
    with_isolated_env(|temp_dir| {
        let path = temp_dir.path().join("content-ai.toml");
        std::fs::write(&path, FILE_CONFIG).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.provider_type, ProviderType::OpenAI);
        assert_eq!(config.attachments.unsupported, UnsupportedPolicy::Reject);
        assert_eq!(config.logging.level, "info");

        // Lists are replaced, untouched lists keep their defaults.
        assert_eq!(config.catalog.platforms, vec!["Instagram", "Threads"]);
        assert_eq!(config.catalog.tones[0], "Gần gũi");
        let defaults = config.catalog.default_inputs();
        assert_eq!(defaults.platform, "Instagram");
        assert_eq!(defaults.context, "");

        match config.provider.to_model_provider().unwrap() {
            ModelProvider::OpenAI {
                model,
                api_key,
                base_url,
            } => {
                assert_eq!(model, "gpt-4o-mini");
                assert_eq!(api_key, "sk-inline");
                assert_eq!(base_url.as_deref(), Some("http://localhost:8080/v1"));
            }
            other => panic!("unexpected provider: {:?}", other),
        }

        let payload = PromptBuilder::new(config.brand.clone())
            .build(&GenerationRequest::new(defaults, None));
        assert!(payload.instructions.contains("Acme Bank"));
        assert!(payload.instructions.contains("#Acme"));
        assert!(payload.instructions.contains("in English"));
        assert!(payload.instructions.contains("None provided"));
    });
}

#[test]
fn test_project_file_and_environment_layering() {
    with_isolated_env(|temp_dir| {
        let project = temp_dir.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::write(
            project.join("content-ai.toml"),
            "[provider]\nmodel = \"from-file\"\n\n[history]\nstore_path = \"/tmp/content-ai-history\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&project).unwrap();
        assert_eq!(config.provider.model, "from-file");
        assert_eq!(
            config.history.resolve_store_path().unwrap(),
            std::path::PathBuf::from("/tmp/content-ai-history")
        );

        std::env::set_var("CONTENT_AI__PROVIDER__MODEL", "from-env");
        let config = ConfigLoader::load(&project);
        std::env::remove_var("CONTENT_AI__PROVIDER__MODEL");
        assert_eq!(config.unwrap().provider.model, "from-env");
    });
}

#[test]
fn test_api_key_falls_back_to_generic_variable() {
    with_isolated_env(|_| {
        let saved: Vec<(&str, Option<String>)> = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .map(|var| (*var, std::env::var(var).ok()))
            .collect();
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("API_KEY");

        let config = AppConfig::default();
        let missing = config.provider.resolve_api_key();

        std::env::set_var("API_KEY", "generic-key");
        let fallback = config.provider.resolve_api_key();

        std::env::set_var("GEMINI_API_KEY", "gemini-key");
        let primary = config.provider.resolve_api_key();

        for (var, value) in saved {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }

        assert!(matches!(missing, Err(ApiError::ConfigError(_))));
        assert_eq!(fallback.unwrap(), "generic-key");
        assert_eq!(primary.unwrap(), "gemini-key");
    });
}

#[test]
fn test_invalid_values_are_reported_together() {
    with_isolated_env(|temp_dir| {
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(
            &path,
            "[provider]\nmodel = \" \"\n\n[brand]\nhashtag = \"NoHash\"\n\n[catalog]\ntones = []\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        let err = config.ensure_valid().unwrap_err();
        assert!(err.to_string().contains("NoHash"));
    });
}
