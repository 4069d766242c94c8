use std::{cell::RefCell, path::PathBuf, rc::Rc};

use super::*;
use crate::{
    foundation::error::SlipError,
    form::state::SlipPayload,
    identity::{Identity, StaticIdentity},
    notify::notice::NoticeLevel,
};

#[derive(Clone, Default)]
struct FakeSubmitter {
    calls: Rc<RefCell<Vec<SlipPayload>>>,
    reject: bool,
}

impl Submitter for FakeSubmitter {
    async fn submit(&self, payload: &SlipPayload) -> SlipResult<()> {
        self.calls.borrow_mut().push(payload.clone());
        // Stay pending for a few polls like a real round trip.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        if self.reject {
            Err(SlipError::submission("endpoint answered 500"))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
struct MemoryExporter {
    files: Rc<RefCell<Vec<String>>>,
}

impl ReceiptExporter for MemoryExporter {
    fn export(&self, file_name: &str, _bytes: &[u8]) -> SlipResult<PathBuf> {
        self.files.borrow_mut().push(file_name.to_string());
        Ok(PathBuf::from(file_name))
    }
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Notice>>>);

impl Notifier for Recorder {
    fn notify(&self, notice: &Notice) {
        self.0.borrow_mut().push(notice.clone());
    }
}

struct Harness {
    ctrl: FormController<FakeSubmitter, MemoryExporter>,
    calls: Rc<RefCell<Vec<SlipPayload>>>,
    files: Rc<RefCell<Vec<String>>>,
    notices: Rc<RefCell<Vec<Notice>>>,
}

fn harness_with(cfg: SlipConfig, reject: bool) -> Harness {
    let submitter = FakeSubmitter {
        reject,
        ..FakeSubmitter::default()
    };
    let exporter = MemoryExporter::default();
    let recorder = Recorder::default();
    Harness {
        calls: submitter.calls.clone(),
        files: exporter.files.clone(),
        notices: recorder.0.clone(),
        ctrl: FormController::new(Arc::new(cfg), submitter, exporter).with_notifier(recorder),
    }
}

fn harness(reject: bool) -> Harness {
    let mut cfg = SlipConfig::default();
    cfg.receipt.scale = 0.25;
    harness_with(cfg, reject)
}

fn fill(ctrl: &FormController<FakeSubmitter, MemoryExporter>) {
    ctrl.update_field(Field::FullName, "Juan M. Dela Cruz").unwrap();
    ctrl.update_field(Field::Rank, "Teacher I").unwrap();
    ctrl.update_field(Field::TimeOut, "08:00").unwrap();
    ctrl.update_field(Field::TimeReturn, "10:00").unwrap();
    ctrl.update_field(Field::PlacesToVisit, "Division Office").unwrap();
    ctrl.update_field(Field::ReasonForVisit, "").unwrap();
    ctrl.set_agreed(true);
}

#[test]
fn update_field_clears_only_its_error() {
    let h = harness(false);
    assert!(!h.ctrl.validate());
    let before = h.ctrl.errors();
    assert!(before.contains(Field::FullName) && before.contains(Field::Rank));

    h.ctrl.update_field(Field::FullName, "Ana Reyes").unwrap();
    let after = h.ctrl.errors();
    assert!(!after.contains(Field::FullName));
    assert!(after.contains(Field::Rank));
    assert_eq!(after.len(), before.len() - 1);

    // Clearing does not re-validate: an invalid value stays error-free until the next check.
    h.ctrl.update_field(Field::TimeOut, "later").unwrap();
    assert!(!h.ctrl.errors().contains(Field::TimeOut));
    assert!(!h.ctrl.validate());
    assert!(h.ctrl.errors().contains(Field::TimeOut));
}

#[test]
fn validate_replaces_errors_wholesale() {
    let h = harness(false);
    assert!(!h.ctrl.validate());
    fill(&h.ctrl);
    assert!(h.ctrl.validate());
    assert!(h.ctrl.errors().is_empty());
}

#[tokio::test]
async fn invalid_form_never_reaches_the_network() {
    let h = harness(false);
    h.ctrl.update_field(Field::FullName, "Juan").unwrap();

    let outcome = h.ctrl.submit().await;
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected Invalid, got {outcome:?}");
    };
    assert!(errors.contains(Field::Rank));
    assert!(h.calls.borrow().is_empty());
    assert!(h.files.borrow().is_empty());
    assert!(h.notices.borrow().is_empty());
    assert!(!h.ctrl.is_submitting());
    assert_eq!(h.ctrl.form().full_name, "Juan");
}

#[tokio::test]
async fn accepted_submission_exports_one_receipt_and_resets() {
    let h = harness(false);
    fill(&h.ctrl);
    let submitted = h.ctrl.form();

    let outcome = h.ctrl.submit().await;
    let SubmitOutcome::Submitted(artifact) = outcome else {
        panic!("expected Submitted, got {outcome:?}");
    };

    assert_eq!(h.calls.borrow().as_slice(), &[submitted.payload()]);
    assert_eq!(
        h.files.borrow().as_slice(),
        &["pass-slip-juan-m.-dela-cruz.jpg".to_string()]
    );
    assert_eq!(artifact.file_name, "pass-slip-juan-m.-dela-cruz.jpg");
    assert!(artifact.transaction_id.starts_with("GNHS-"));

    assert_eq!(h.ctrl.form(), FormState::default());
    assert!(h.ctrl.errors().is_empty());
    assert!(!h.ctrl.is_submitting());

    let notices = h.notices.borrow();
    assert_eq!(notices.as_slice(), &[Notice::success(SUBMIT_SUCCESS_MESSAGE)]);
}

#[tokio::test]
async fn single_digit_hours_go_out_zero_padded() {
    let h = harness(false);
    fill(&h.ctrl);
    h.ctrl.update_field(Field::TimeOut, "8:00").unwrap();
    h.ctrl.update_field(Field::TimeReturn, "9:30").unwrap();

    let outcome = h.ctrl.submit().await;
    assert!(outcome.is_accepted(), "{outcome:?}");

    let calls = h.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].time_out, "08:00");
    assert_eq!(calls[0].time_return, "09:30");
    let wire = serde_json::to_value(&calls[0]).unwrap();
    assert_eq!(wire["timeOut"], "08:00");
}

#[tokio::test]
async fn rejected_submission_keeps_the_form() {
    let h = harness(true);
    fill(&h.ctrl);
    let before = h.ctrl.form();

    let outcome = h.ctrl.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed { .. }), "{outcome:?}");
    assert!(!outcome.is_accepted());

    assert_eq!(h.calls.borrow().len(), 1);
    assert!(h.files.borrow().is_empty());
    assert_eq!(h.ctrl.form(), before);
    assert!(!h.ctrl.is_submitting());

    let notices = h.notices.borrow();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Failure);
    assert_eq!(notices[0].message, SUBMIT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn retry_after_failure_sends_again() {
    let h = harness(true);
    fill(&h.ctrl);
    h.ctrl.submit().await;
    h.ctrl.submit().await;
    assert_eq!(h.calls.borrow().len(), 2);
}

#[tokio::test]
async fn overlapping_submit_is_ignored() {
    let h = harness(false);
    fill(&h.ctrl);

    let (first, second) = tokio::join!(h.ctrl.submit(), h.ctrl.submit());
    assert!(matches!(first, SubmitOutcome::Submitted(_)), "{first:?}");
    assert!(matches!(second, SubmitOutcome::Busy), "{second:?}");
    assert_eq!(h.calls.borrow().len(), 1);
    assert_eq!(h.files.borrow().len(), 1);
    assert!(!h.ctrl.is_submitting());
}

#[tokio::test]
async fn receipt_failure_is_reported_as_compensating_state() {
    let mut cfg = SlipConfig::default();
    // Rasterization rejects a zero scale after the endpoint accepted.
    cfg.receipt.scale = 0.0;
    let h = harness_with(cfg, false);
    fill(&h.ctrl);
    let submitted = h.ctrl.form();

    let outcome = h.ctrl.submit().await;
    assert!(outcome.is_accepted());
    let SubmitOutcome::SubmittedWithoutReceipt { reason, snapshot } = outcome else {
        panic!("expected SubmittedWithoutReceipt");
    };
    assert!(reason.contains("render error"), "{reason}");
    assert_eq!(*snapshot, submitted);

    assert_eq!(h.calls.borrow().len(), 1);
    assert!(h.files.borrow().is_empty());
    assert_eq!(h.ctrl.form(), FormState::default());
    assert!(!h.ctrl.is_submitting());

    let notices = h.notices.borrow();
    let levels: Vec<NoticeLevel> = notices.iter().map(|n| n.level).collect();
    assert_eq!(levels, [NoticeLevel::Failure, NoticeLevel::Warning]);
    assert!(notices.iter().all(|n| n.message != SUBMIT_SUCCESS_MESSAGE));
}

#[tokio::test]
async fn identity_is_optional_context() {
    let h = harness(false);
    let ctrl = h.ctrl.with_identity(StaticIdentity(Some(Identity {
        uid: "u-1".to_string(),
        display_name: Some("Juan".to_string()),
        email: None,
    })));
    fill(&ctrl);
    assert!(matches!(ctrl.submit().await, SubmitOutcome::Submitted(_)));
    assert_eq!(h.calls.borrow().len(), 1);
}
