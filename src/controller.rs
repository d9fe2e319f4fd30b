//! Orchestration Controller
//!
//! Owns the form state, the displayed result or error, and the history log,
//! and drives one submission at a time through
//! `Idle -> Validating -> Generating -> {Succeeded, Failed}`.

use crate::attachment::{self, Attachment, EncodedContent, UnsupportedPolicy};
use crate::config::AppConfig;
use crate::error::{ApiError, VALIDATION_MESSAGE};
use crate::generation::GenerationClient;
use crate::history::{HistoryStorage, HistoryStore};
use crate::prompt::{GenerationRequest, PromptBuilder};
use crate::provider::ModelProviderClient;
use crate::types::{FormInputs, GenerationResult, HistoryInput, ReusedInputs};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the controller is in the submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Generating,
    Succeeded,
    Failed,
}

/// Result of a submit trigger that was not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Generated(GenerationResult),
    /// A generation was already in flight; nothing was started.
    Busy,
}

pub struct Controller {
    form: FormInputs,
    attachment: Option<Attachment>,
    result: Option<GenerationResult>,
    error: Option<String>,
    state: SubmissionState,
    history: HistoryStore,
    builder: PromptBuilder,
    client: GenerationClient,
    unsupported_policy: UnsupportedPolicy,
}

impl Controller {
    pub fn new(
        form: FormInputs,
        history: HistoryStore,
        builder: PromptBuilder,
        client: GenerationClient,
        unsupported_policy: UnsupportedPolicy,
    ) -> Self {
        Self {
            form,
            attachment: None,
            result: None,
            error: None,
            state: SubmissionState::Idle,
            history,
            builder,
            client,
            unsupported_policy,
        }
    }

    /// Wire a controller from configuration, a provider client and history storage.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn ModelProviderClient>,
        storage: Arc<dyn HistoryStorage>,
    ) -> Self {
        Self::with_history(config, provider, HistoryStore::load(storage))
    }

    /// Wire a controller around an already loaded history log.
    pub fn with_history(
        config: &AppConfig,
        provider: Arc<dyn ModelProviderClient>,
        history: HistoryStore,
    ) -> Self {
        Self::new(
            config.catalog.default_inputs(),
            history,
            PromptBuilder::new(config.brand.clone()),
            GenerationClient::new(provider),
            config.attachments.unsupported,
        )
    }

    pub fn form(&self) -> &FormInputs {
        &self.form
    }

    pub fn set_form(&mut self, form: FormInputs) {
        self.form = form;
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    pub fn remove_attachment(&mut self) {
        self.attachment = None;
    }

    /// Result of the last successful submission, for display.
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// User-facing message of the last rejected or failed submission.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// True while a generation call is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == SubmissionState::Generating
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn delete_history_entry(&mut self, id: &str) -> bool {
        self.history.delete(id)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Repopulate the form from a history entry.
    ///
    /// The attachment is dropped (its bytes were never stored) and any displayed
    /// result or error is cleared.
    pub fn apply_reuse(&mut self, id: &str) -> Result<ReusedInputs, ApiError> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| ApiError::EntryNotFound(id.to_string()))?;
        let reused = HistoryStore::reuse(entry);
        self.form = reused.form.clone();
        self.attachment = None;
        self.result = None;
        self.error = None;
        self.state = SubmissionState::Idle;
        debug!(id = %id, file_name = ?reused.file_name, "Form repopulated from history");
        Ok(reused)
    }

    /// A submission needs typed context or an attachment. Context is not
    /// trimmed, so whitespace-only context counts as content.
    pub fn check_submittable(context: &str, has_attachment: bool) -> Result<(), ApiError> {
        if context.is_empty() && !has_attachment {
            return Err(ApiError::Validation(VALIDATION_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Submit the current form and attachment.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ApiError> {
        if self.is_loading() {
            debug!("Submit ignored while a generation is in flight");
            return Ok(SubmitOutcome::Busy);
        }

        self.result = None;
        self.error = None;
        self.state = SubmissionState::Validating;

        if let Err(e) = Self::check_submittable(&self.form.context, self.attachment.is_some()) {
            self.error = Some(e.user_message());
            self.state = SubmissionState::Idle;
            return Err(e);
        }

        let in_flight = InFlight::start(&mut self.state);
        let outcome = generate(
            &self.form,
            self.attachment.as_ref(),
            &self.builder,
            &self.client,
            self.unsupported_policy,
        )
        .await;
        match outcome {
            Ok(result) => {
                let inputs = HistoryInput {
                    form: self.form.clone(),
                    file_name: self.attachment.as_ref().map(|a| a.name.clone()),
                };
                let id = self.history.record(inputs, result.clone()).id.clone();
                info!(id = %id, hashtags = result.hashtags.len(), "Generation succeeded");
                self.result = Some(result.clone());
                in_flight.settle(SubmissionState::Succeeded);
                Ok(SubmitOutcome::Generated(result))
            }
            Err(e) => {
                warn!(error = %e, "Generation failed");
                self.error = Some(e.user_message());
                in_flight.settle(SubmissionState::Failed);
                Err(e)
            }
        }
    }
}

/// Holds the controller in `Generating` until settled. A submission dropped
/// mid-call returns the controller to `Idle`.
struct InFlight<'a> {
    state: &'a mut SubmissionState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(state: &'a mut SubmissionState) -> Self {
        *state = SubmissionState::Generating;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: SubmissionState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Submission abandoned before the provider replied");
            *self.state = SubmissionState::Idle;
        }
    }
}

async fn generate(
    form: &FormInputs,
    attached: Option<&Attachment>,
    builder: &PromptBuilder,
    client: &GenerationClient,
    unsupported_policy: UnsupportedPolicy,
) -> Result<GenerationResult, ApiError> {
    let encoded = match attached {
        Some(file) => {
            let encoded = attachment::encode(file).await?;
            if encoded.content == EncodedContent::Unsupported {
                match unsupported_policy {
                    UnsupportedPolicy::Reject => {
                        return Err(ApiError::UnsupportedAttachmentType {
                            file_name: file.name.clone(),
                            media_type: file.media_type.clone(),
                        });
                    }
                    UnsupportedPolicy::Ignore => {
                        warn!(
                            file_name = %file.name,
                            media_type = %file.media_type,
                            "Ignoring attachment with unsupported media type"
                        );
                    }
                }
            }
            Some(encoded)
        }
        None => None,
    };

    let request = GenerationRequest::new(form.clone(), encoded);
    let payload = builder.build(&request);
    client.generate(payload, &builder.schema()).await
}
