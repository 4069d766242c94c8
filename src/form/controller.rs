use std::{
    cell::{Cell, RefCell},
    sync::Arc,
};

use crate::{
    config::settings::SlipConfig,
    form::{
        state::{Field, FormState},
        validate::{ValidationErrors, validate_form},
    },
    foundation::error::SlipResult,
    identity::IdentityProvider,
    notify::notice::{
        LogNotifier, Notice, Notifier, RECEIPT_FAILURE_MESSAGE, SUBMIT_FAILURE_MESSAGE,
        SUBMIT_SUCCESS_MESSAGE,
    },
    receipt::{
        export::ReceiptExporter,
        renderer::{ReceiptArtifact, ReceiptRenderer},
    },
    submit::http::Submitter,
};

/// Shown after a receipt failure so the user knows the record itself went through.
pub const SUBMITTED_WITHOUT_RECEIPT_MESSAGE: &str =
    "Your locator slip was submitted, but the receipt image is unavailable.";

/// How a call to [`FormController::submit`] ended.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Another submission is still in flight; nothing was done.
    Busy,
    /// The form failed validation; nothing was sent.
    Invalid(ValidationErrors),
    /// The endpoint was unreachable or refused the slip. The form is untouched.
    Failed {
        /// Why the submission failed.
        reason: String,
    },
    /// Accepted remotely and the receipt was exported. The form has been reset.
    Submitted(ReceiptArtifact),
    /// Accepted remotely, but the receipt could not be produced. The form has been reset and
    /// `snapshot` holds what was submitted so the receipt can be regenerated.
    SubmittedWithoutReceipt {
        /// Why the receipt failed.
        reason: String,
        /// The form as it was sent.
        snapshot: Box<FormState>,
    },
}

impl SubmitOutcome {
    /// Whether the endpoint accepted the slip.
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Submitted(_) | SubmitOutcome::SubmittedWithoutReceipt { .. }
        )
    }
}

/// Owns the form and its validation state and runs the submit sequence.
///
/// Methods take `&self`: the controller lives on a single thread and a second `submit()` polled
/// while the first is awaiting the network sees the busy flag and returns
/// [`SubmitOutcome::Busy`].
pub struct FormController<S, E> {
    config: Arc<SlipConfig>,
    form: RefCell<FormState>,
    errors: RefCell<ValidationErrors>,
    submitting: Cell<bool>,
    submitter: S,
    renderer: ReceiptRenderer<E>,
    notifier: Box<dyn Notifier>,
    identity: Option<Box<dyn IdentityProvider>>,
}

impl<S: Submitter, E: ReceiptExporter> FormController<S, E> {
    /// An empty form that notifies through the log and has no identity provider.
    pub fn new(config: Arc<SlipConfig>, submitter: S, exporter: E) -> Self {
        Self {
            renderer: ReceiptRenderer::new(config.clone(), exporter),
            config,
            form: RefCell::new(FormState::default()),
            errors: RefCell::new(ValidationErrors::default()),
            submitting: Cell::new(false),
            submitter,
            notifier: Box::new(LogNotifier),
            identity: None,
        }
    }

    /// Route notices to `notifier` instead of the log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Record the signed-in user from `provider` with each submission.
    pub fn with_identity(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = Some(Box::new(provider));
        self
    }

    /// Settings the controller validates and renders with.
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// The submitter slips are sent through.
    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// The receipt renderer.
    pub fn renderer(&self) -> &ReceiptRenderer<E> {
        &self.renderer
    }

    /// Snapshot of the current form contents.
    pub fn form(&self) -> FormState {
        self.form.borrow().clone()
    }

    /// Snapshot of the current field errors.
    pub fn errors(&self) -> ValidationErrors {
        self.errors.borrow().clone()
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    /// Set one field and clear any error shown for it. Other errors are left alone.
    pub fn update_field(&self, field: Field, value: impl Into<String>) -> SlipResult<()> {
        self.form.borrow_mut().set(field, value)?;
        self.errors.borrow_mut().clear(field);
        Ok(())
    }

    /// Tick or clear the agreement and drop its error.
    pub fn set_agreed(&self, agreed: bool) {
        self.form.borrow_mut().set_agreed(agreed);
        self.errors.borrow_mut().clear(Field::Agreed);
    }

    /// Recompute every field error from the current form. Returns `true` when there are none.
    pub fn validate(&self) -> bool {
        let errors = validate_form(&self.form.borrow(), &self.config);
        let ok = errors.is_empty();
        *self.errors.borrow_mut() = errors;
        ok
    }

    /// Validate, send the slip once, and on acceptance render the receipt and reset the form.
    ///
    /// Every failure is turned into a notice; nothing escapes as an error.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.submitting.get() {
            tracing::debug!("submit ignored, previous submission in flight");
            return SubmitOutcome::Busy;
        }

        if !self.validate() {
            let errors = self.errors();
            tracing::debug!(fields = errors.len(), "submit blocked by validation");
            return SubmitOutcome::Invalid(errors);
        }

        let _busy = BusyGuard::engage(&self.submitting);
        let snapshot = self.form();

        match self.identity.as_ref().and_then(|p| p.current_identity()) {
            Some(who) => tracing::info!(signed_in = who.label(), "submitting locator slip"),
            None => tracing::info!("submitting locator slip"),
        }

        if let Err(e) = self.submitter.submit(&snapshot.payload()).await {
            tracing::error!(error = %e, "submission failed");
            self.notifier.notify(&Notice::failure(SUBMIT_FAILURE_MESSAGE));
            return SubmitOutcome::Failed {
                reason: e.to_string(),
            };
        }

        let receipt = self.renderer.render(&snapshot);
        self.reset();

        match receipt {
            Ok(artifact) => {
                tracing::info!(
                    transaction = %artifact.transaction_id,
                    file = %artifact.file_name,
                    "locator slip submitted"
                );
                self.notifier.notify(&Notice::success(SUBMIT_SUCCESS_MESSAGE));
                SubmitOutcome::Submitted(artifact)
            }
            Err(e) => {
                tracing::error!(error = %e, "receipt generation failed after submission");
                self.notifier.notify(&Notice::failure(RECEIPT_FAILURE_MESSAGE));
                self.notifier
                    .notify(&Notice::warning(SUBMITTED_WITHOUT_RECEIPT_MESSAGE));
                SubmitOutcome::SubmittedWithoutReceipt {
                    reason: e.to_string(),
                    snapshot: Box::new(snapshot),
                }
            }
        }
    }

    fn reset(&self) {
        *self.form.borrow_mut() = FormState::default();
        *self.errors.borrow_mut() = ValidationErrors::default();
    }
}

/// Holds the submitting flag for the lifetime of one submission.
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/form/controller.rs"]
mod tests;
