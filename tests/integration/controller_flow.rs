//! Integration tests for the submission flow: validation, attachments,
//! provider failures, history recording and reuse.

use super::test_utils::{ScriptedProvider, VALID_REPLY};
use content_ai::attachment::Attachment;
use content_ai::config::AppConfig;
use content_ai::controller::{Controller, SubmissionState, SubmitOutcome};
use content_ai::error::{
    ApiError, GENERATION_FAILED_MESSAGE, MALFORMED_RESPONSE_MESSAGE, VALIDATION_MESSAGE,
};
use content_ai::history::{HistoryStorage, MemoryHistoryStorage, SledHistoryStorage};
use content_ai::types::HistoryEntry;
use std::sync::Arc;
use tempfile::TempDir;

fn controller_with(
    provider: Arc<ScriptedProvider>,
    storage: Arc<dyn HistoryStorage>,
) -> Controller {
    Controller::from_config(&AppConfig::default(), provider, storage)
}

fn stored(storage: &MemoryHistoryStorage) -> Vec<HistoryEntry> {
    serde_json::from_slice(&storage.contents().unwrap()).unwrap()
}

#[tokio::test]
async fn test_empty_submission_makes_no_call_and_keeps_history() {
    let provider = ScriptedProvider::replying(vec![Ok(VALID_REPLY.to_string())]);
    let storage = Arc::new(MemoryHistoryStorage::new());
    let mut controller = controller_with(provider.clone(), storage.clone());

    let err = controller.submit().await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(err.user_message(), VALIDATION_MESSAGE);
    assert_eq!(controller.error(), Some(VALIDATION_MESSAGE));
    assert!(!controller.is_loading());
    assert_eq!(provider.calls(), 0);
    assert!(controller.history().is_empty());
    assert_eq!(storage.contents(), None);
}

#[tokio::test]
async fn test_text_attachment_is_inlined_and_recorded_by_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, "Doanh thu quý 3 tăng 12%").unwrap();

    let provider = ScriptedProvider::replying(vec![Ok(VALID_REPLY.to_string())]);
    let storage = Arc::new(MemoryHistoryStorage::new());
    let mut controller = controller_with(provider.clone(), storage.clone());
    controller.attach(Attachment::from_path(&path));

    let outcome = controller.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Generated(_)));
    assert_eq!(controller.state(), SubmissionState::Succeeded);

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let instructions = &requests[0].payload.instructions;
    assert!(
        instructions.contains("[Data from attached file report.txt]:\nDoanh thu quý 3 tăng 12%")
    );
    assert!(!requests[0].payload.is_multipart());

    let entries = stored(&storage);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].inputs.file_name.as_deref(), Some("report.txt"));
    assert_eq!(entries[0].inputs.form.context, "");
    assert_eq!(entries[0].result.title, "Ra mắt thẻ mới");
}

#[tokio::test]
async fn test_image_attachment_travels_as_binary_part() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("banner.png");
    std::fs::write(&path, b"\x89PNG").unwrap();

    let provider = ScriptedProvider::replying(vec![Ok(VALID_REPLY.to_string())]);
    let mut controller =
        controller_with(provider.clone(), Arc::new(MemoryHistoryStorage::new()));
    let mut form = controller.form().clone();
    form.context = "Thẻ mới cho Gen Z".to_string();
    controller.set_form(form);
    controller.attach(Attachment::from_path(&path));

    controller.submit().await.unwrap();

    let requests = provider.requests();
    let binary = requests[0].payload.binary_part.as_ref().unwrap();
    assert_eq!(binary.media_type, "image/png");
    assert_eq!(binary.data, "iVBORw==");
    assert!(requests[0].payload.instructions.contains("Thẻ mới cho Gen Z"));
    assert!(!requests[0].payload.instructions.contains("iVBORw=="));
}

#[tokio::test]
async fn test_provider_failure_shows_generic_message_and_records_nothing() {
    let provider = ScriptedProvider::replying(vec![
        Ok(VALID_REPLY.to_string()),
        Err(ApiError::ProviderAuthFailed("API key not valid".to_string())),
    ]);
    let storage = Arc::new(MemoryHistoryStorage::new());
    let mut controller = controller_with(provider, storage.clone());
    let mut form = controller.form().clone();
    form.context = "ra mắt thẻ mới".to_string();
    controller.set_form(form);

    controller.submit().await.unwrap();
    let err = controller.submit().await.unwrap_err();

    assert!(err.is_provider_failure());
    assert_eq!(controller.error(), Some(GENERATION_FAILED_MESSAGE));
    assert_eq!(controller.state(), SubmissionState::Failed);
    assert!(controller.result().is_none());
    assert_eq!(stored(&storage).len(), 1);
}

#[tokio::test]
async fn test_malformed_reply_is_rejected_without_history() {
    let provider = ScriptedProvider::replying(vec![Ok(r#"{"title":"only"}"#.to_string())]);
    let storage = Arc::new(MemoryHistoryStorage::new());
    let mut controller = controller_with(provider, storage.clone());
    let mut form = controller.form().clone();
    form.context = "x".to_string();
    controller.set_form(form);

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
    assert_eq!(controller.error(), Some(MALFORMED_RESPONSE_MESSAGE));
    assert!(controller.history().is_empty());
    assert_eq!(storage.contents(), None);
}

#[tokio::test]
async fn test_reuse_of_attachment_only_entry_needs_reattach() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");
    std::fs::write(&path, "data").unwrap();

    let provider = ScriptedProvider::replying(vec![
        Ok(VALID_REPLY.to_string()),
        Ok(VALID_REPLY.to_string()),
    ]);
    let mut controller =
        controller_with(provider.clone(), Arc::new(MemoryHistoryStorage::new()));
    controller.attach(Attachment::from_path(&path));
    controller.submit().await.unwrap();
    let id = controller.history().entries()[0].id.clone();

    let reused = controller.apply_reuse(&id).unwrap();
    assert_eq!(reused.file_name.as_deref(), Some("report.txt"));
    assert!(controller.attachment().is_none());

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(provider.calls(), 1);

    controller.attach(Attachment::from_path(&path));
    controller.submit().await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(controller.history().len(), 2);
}

#[tokio::test]
async fn test_history_survives_restart_and_delete_persists_empty_list() {
    let dir = TempDir::new().unwrap();
    // One handle for the whole test; each phase rebuilds its store from the bytes on disk.
    let db = sled::open(dir.path().join("history")).unwrap();

    let id = {
        let provider = ScriptedProvider::replying(vec![Ok(VALID_REPLY.to_string())]);
        let storage = Arc::new(SledHistoryStorage::from_db(db.clone()));
        let mut controller = controller_with(provider, storage);
        let mut form = controller.form().clone();
        form.context = "ra mắt thẻ mới".to_string();
        controller.set_form(form);
        controller.submit().await.unwrap();
        controller.history().entries()[0].id.clone()
    };

    {
        let storage = Arc::new(SledHistoryStorage::from_db(db.clone()));
        let mut controller = controller_with(ScriptedProvider::replying(vec![]), storage);
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history().entries()[0].id, id);
        assert!(controller.delete_history_entry(&id));
    }

    let storage = SledHistoryStorage::from_db(db);
    assert_eq!(storage.read().unwrap(), Some(b"[]".to_vec()));
}
