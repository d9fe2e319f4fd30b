//! Integration tests for the CLI route table

use super::test_utils::{with_isolated_env, ScriptedProvider, VALID_REPLY};
use clap::Parser;
use content_ai::cli::{map_error, Cli, RunContext};
use content_ai::config::AppConfig;
use content_ai::error::ApiError;
use content_ai::history::{HistoryStore, MemoryHistoryStorage};
use content_ai::types::{GenerationResult, HistoryEntry, HistoryInput};
use std::sync::Arc;
use tempfile::TempDir;

fn run(context: &RunContext, args: &[&str]) -> Result<String, ApiError> {
    let mut full = vec!["content-ai"];
    full.extend_from_slice(args);
    let cli = Cli::try_parse_from(full).unwrap();
    context.execute(&cli.command)
}

fn context_with(replies: Vec<Result<String, ApiError>>) -> (RunContext, Arc<ScriptedProvider>) {
    let provider = ScriptedProvider::replying(replies);
    let context = RunContext::with_parts(
        AppConfig::default(),
        Some(Arc::new(MemoryHistoryStorage::new())),
        Some(provider.clone()),
    );
    (context, provider)
}

#[test]
fn test_generate_then_list_and_show() {
    let (context, provider) = context_with(vec![Ok(VALID_REPLY.to_string())]);

    let out = run(
        &context,
        &[
            "generate",
            "--context",
            "ra mắt thẻ mới",
            "--platform",
            "Zalo",
            "--format",
            "json",
        ],
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["title"], "Ra mắt thẻ mới");
    let id = value["id"].as_str().unwrap().to_string();
    assert_eq!(provider.calls(), 1);
    assert!(provider.requests()[0].payload.instructions.contains("Zalo"));

    let listed = run(&context, &["history", "list", "--format", "json"]).unwrap();
    let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["entries"][0]["id"], id.as_str());
    assert_eq!(listed["entries"][0]["inputs"]["platform"], "Zalo");

    let text = run(&context, &["history", "list"]).unwrap();
    assert!(text.contains(&id));
    assert!(text.contains("Total: 1 entry"));

    let shown = run(&context, &["history", "show", &id]).unwrap();
    assert!(shown.contains("ra mắt thẻ mới"));
    assert!(shown.contains("#TheMoi"));
}

#[test]
fn test_generate_without_input_is_rejected_before_any_call() {
    let (context, provider) = context_with(vec![]);
    let err = run(&context, &["generate"]).unwrap_err();
    assert_eq!(
        map_error(&err),
        "Error: Please enter some content or attach a file."
    );
    assert_eq!(provider.calls(), 0);
}

/// Empty input is reported as such even when no provider can be built.
#[test]
fn test_empty_generate_is_rejected_without_api_key() {
    with_isolated_env(|_| {
        let saved: Vec<(&str, Option<String>)> = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .map(|var| (*var, std::env::var(var).ok()))
            .collect();
        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("API_KEY");

        let storage = Arc::new(MemoryHistoryStorage::new());
        let context = RunContext::with_parts(AppConfig::default(), Some(storage.clone()), None);
        let generated = run(&context, &["generate"]);

        let mut store = HistoryStore::load(storage);
        store.append(HistoryEntry {
            id: "from-file".to_string(),
            timestamp: 1_700_000_000_000,
            inputs: HistoryInput {
                form: AppConfig::default().catalog.default_inputs(),
                file_name: Some("report.pdf".to_string()),
            },
            result: GenerationResult {
                title: "t".to_string(),
                post: "p".to_string(),
                hashtags: vec!["#BIDV".to_string()],
            },
        });
        let reused = run(&context, &["history", "reuse", "from-file"]);
        let with_content = run(&context, &["generate", "--context", "x"]);

        for (var, value) in saved {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }

        assert!(matches!(generated, Err(ApiError::Validation(_))));
        assert!(matches!(reused, Err(ApiError::Validation(_))));
        assert!(matches!(with_content, Err(ApiError::ConfigError(_))));
    });
}

#[test]
fn test_unknown_catalog_value_is_rejected() {
    let (context, provider) = context_with(vec![]);
    let err = run(&context, &["generate", "--context", "x", "--platform", "MySpace"]).unwrap_err();
    match err {
        ApiError::Validation(msg) => assert!(msg.contains("platform")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_provider_failure_maps_to_generic_message() {
    let (context, _) = context_with(vec![Err(ApiError::ProviderRequestFailed(
        "Request failed with status 500".to_string(),
    ))]);
    let err = run(&context, &["generate", "--context", "x"]).unwrap_err();
    let message = map_error(&err);
    assert!(message.contains("Failed to generate content"));
    assert!(!message.contains("500"));

    let listed = run(&context, &["history", "list"]).unwrap();
    assert!(listed.starts_with("No history yet."));
}

#[test]
fn test_delete_clear_and_missing_ids() {
    let (context, _) = context_with(vec![
        Ok(VALID_REPLY.to_string()),
        Ok(VALID_REPLY.to_string()),
    ]);
    run(&context, &["generate", "--context", "a"]).unwrap();
    let out = run(&context, &["generate", "--context", "b", "--format", "json"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let id = value["id"].as_str().unwrap().to_string();

    assert_eq!(
        run(&context, &["history", "delete", &id]).unwrap(),
        format!("Deleted history entry {}", id)
    );
    assert_eq!(
        run(&context, &["history", "delete", &id]).unwrap(),
        format!("No history entry with id {}; nothing deleted", id)
    );
    let listed = run(&context, &["history", "list", "--format", "json"]).unwrap();
    let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(listed["total"], 1);
    assert!(matches!(
        run(&context, &["history", "show", "nope"]),
        Err(ApiError::EntryNotFound(_))
    ));

    assert_eq!(
        run(&context, &["history", "clear", "--yes"]).unwrap(),
        "Cleared 1 history entries"
    );
    assert_eq!(
        run(&context, &["history", "clear", "--yes"]).unwrap(),
        "History is already empty."
    );
}

#[test]
fn test_reuse_regenerates_and_notes_missing_attachment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, "Doanh thu tăng").unwrap();
    let file = path.to_string_lossy().into_owned();

    let (context, provider) = context_with(vec![
        Ok(VALID_REPLY.to_string()),
        Ok(VALID_REPLY.to_string()),
    ]);
    let out = run(
        &context,
        &["generate", "--context", "quý 3", "--file", &file, "--format", "json"],
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let id = value["id"].as_str().unwrap().to_string();

    let out = run(&context, &["history", "reuse", &id]).unwrap();
    assert!(out.contains("report.txt is not stored in history"));
    assert_eq!(provider.calls(), 2);
    let second = &provider.requests()[1].payload.instructions;
    assert!(second.contains("quý 3"));
    assert!(!second.contains("Doanh thu tăng"));
}

#[test]
fn test_options_and_config_show() {
    let mut config = AppConfig::default();
    config.provider.api_key = Some("sk-very-secret".to_string());
    let context = RunContext::with_parts(
        config,
        Some(Arc::new(MemoryHistoryStorage::new())),
        None,
    );

    let options = run(&context, &["options", "--format", "json"]).unwrap();
    let options: serde_json::Value = serde_json::from_str(&options).unwrap();
    assert_eq!(options["platform"][0], "Facebook");
    assert_eq!(options["tone"][0], "Gần gũi");

    let shown = run(&context, &["config", "show"]).unwrap();
    assert!(!shown.contains("sk-very-secret"));
    assert!(shown.contains("<redacted>"));
    let parsed: toml::Value = toml::from_str(&shown).unwrap();
    assert_eq!(parsed["provider"]["provider_type"].as_str(), Some("gemini"));

    let validated = run(&context, &["config", "validate"]).unwrap();
    assert!(validated.contains("API key: set"));
}
