//! Form controller: field edits, validation, announcements and the
//! success window
//!
//! A valid submission clears the form and shows the success indicator for
//! `SUCCESS_WINDOW`. The reset back to idle runs on a tokio task that is
//! aborted whenever a new submit cycle starts or the controller is dropped.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::validate::validate;
use super::{ErrorState, Field, FieldError, FieldUpdate, FormState, SUCCESS_ANNOUNCEMENT};

/// How long the success indicator stays up after a valid submission
pub const SUCCESS_WINDOW: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Invalid,
    SubmittedOk,
}

/// Accessibility state of one field's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub invalid: bool,
    /// Id of the element describing the error, only while there is one
    pub described_by: Option<&'static str>,
}

#[derive(Debug)]
struct ResetFired {
    generation: u64,
}

/// Handle on the pending success-window reset
///
/// At most one reset task exists. Scheduling aborts the previous one, and
/// the handle is released either by `cancel` or when its own firing is
/// consumed.
#[derive(Debug, Default)]
struct ResetTimer {
    task: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
    generation: u64,
}

impl ResetTimer {
    fn schedule(&mut self, after: Duration, tx: UnboundedSender<ResetFired>) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let deadline = Instant::now() + after;
        self.deadline = Some(deadline);
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(ResetFired { generation });
        }));
        generation
    }

    fn cancel(&mut self) -> bool {
        self.deadline = None;
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline.filter(|_| self.is_pending())
    }

    /// Consume a firing. Returns false for a firing that was superseded
    /// after it was sent.
    fn fire(&mut self, generation: u64) -> bool {
        if self.task.is_some() && generation == self.generation {
            self.task = None;
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct FormController {
    state: FormState,
    errors: ErrorState,
    success: bool,
    announcement: String,
    phase: SubmissionPhase,

    reset_timer: ResetTimer,
    reset_tx: UnboundedSender<ResetFired>,
    reset_rx: UnboundedReceiver<ResetFired>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        let (reset_tx, reset_rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::default(),
            errors: ErrorState::default(),
            success: false,
            announcement: String::new(),
            phase: SubmissionPhase::Idle,
            reset_timer: ResetTimer::default(),
            reset_tx,
            reset_rx,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(field)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Text for the polite live region
    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn has_pending_reset(&self) -> bool {
        self.reset_timer.is_pending()
    }

    /// When the open success window is due to close, if one is open
    pub fn reset_deadline(&self) -> Option<Instant> {
        if !self.has_pending_reset() {
            return None;
        }
        self.reset_timer.deadline()
    }

    pub fn annotation(&self, field: Field) -> Annotation {
        let invalid = self.errors.get(field).is_some();
        Annotation {
            invalid,
            described_by: invalid.then(|| field.error_id()),
        }
    }

    /// Store a field value verbatim and clear that field's error
    pub fn update_field(&mut self, update: FieldUpdate) {
        let field = update.field();
        self.state.apply(update);
        self.errors.clear(field);
        if self.phase == SubmissionPhase::Invalid {
            self.phase = SubmissionPhase::Idle;
        }
    }

    /// Recompute every field error from the current values
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.state);
        let valid = self.errors.is_empty();

        if valid {
            self.announcement.clear();
        } else {
            self.announcement = self.errors.summary();
        }

        valid
    }

    /// Validate and, when everything passes, clear the form and open the
    /// success window. Returns whether the submission was accepted.
    ///
    /// Must be called inside a tokio runtime: a successful submission spawns
    /// the reset task.
    pub fn submit(&mut self) -> bool {
        // A new cycle supersedes any success window still showing
        if self.reset_timer.cancel() {
            tracing::debug!("Cancelled pending success reset");
        }
        self.success = false;
        self.phase = SubmissionPhase::Validating;

        if !self.validate() {
            self.phase = SubmissionPhase::Invalid;
            let invalid: Vec<&str> = self.errors.iter().map(|(field, _)| field.id()).collect();
            tracing::debug!("Submission rejected, invalid fields: {}", invalid.join(", "));
            return false;
        }

        self.success = true;
        self.state = FormState::default();
        self.announcement = SUCCESS_ANNOUNCEMENT.to_string();
        self.phase = SubmissionPhase::SubmittedOk;

        let generation = self
            .reset_timer
            .schedule(SUCCESS_WINDOW, self.reset_tx.clone());
        tracing::debug!("Submission accepted, success reset #{} scheduled", generation);
        true
    }

    /// Apply a success-window reset that has fired since the last call.
    /// Returns whether the form went back to idle.
    pub fn tick(&mut self) -> bool {
        let mut reset = false;
        while let Ok(ResetFired { generation }) = self.reset_rx.try_recv() {
            if !self.reset_timer.fire(generation) {
                tracing::debug!("Ignoring stale success reset #{}", generation);
                continue;
            }
            self.success = false;
            self.announcement.clear();
            if self.phase == SubmissionPhase::SubmittedOk {
                self.phase = SubmissionPhase::Idle;
            }
            reset = true;
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::InquiryType;

    fn fill_valid(form: &mut FormController) {
        form.update_field(FieldUpdate::Name("Jane".to_string()));
        form.update_field(FieldUpdate::LastName("Doe".to_string()));
        form.update_field(FieldUpdate::Email("jane@doe.com".to_string()));
        form.update_field(FieldUpdate::Message("Hi".to_string()));
        form.update_field(FieldUpdate::InquiryType(Some(InquiryType::GeneralInquiry)));
        form.update_field(FieldUpdate::Consent(true));
    }

    #[test]
    fn test_new_controller_is_idle_and_empty() {
        let form = FormController::new();
        assert_eq!(form.state(), &FormState::default());
        assert!(form.errors().is_empty());
        assert!(!form.is_success());
        assert_eq!(form.announcement(), "");
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(!form.has_pending_reset());
    }

    #[test]
    fn test_invalid_submit_announces_errors_and_keeps_values() {
        let mut form = FormController::new();
        form.update_field(FieldUpdate::Name("Jane".to_string()));
        form.update_field(FieldUpdate::Email("not-an-email".to_string()));

        assert!(!form.submit());
        assert_eq!(form.phase(), SubmissionPhase::Invalid);
        assert_eq!(form.state().name, "Jane");
        assert_eq!(form.state().email, "not-an-email");
        assert_eq!(form.error(Field::Name), None);
        assert_eq!(form.error(Field::Email), Some(FieldError::EmailInvalid));
        assert_eq!(
            form.announcement(),
            "Lastname is required. Please enter a valid email address. Message is required. \
             Please select an inquiry type. You must consent before submitting."
        );
        assert!(!form.has_pending_reset());
    }

    #[test]
    fn test_empty_email_is_required_not_invalid() {
        let mut form = FormController::new();
        assert!(!form.validate());
        assert_eq!(form.error(Field::Email), Some(FieldError::EmailRequired));

        form.update_field(FieldUpdate::Email("a@b.co".to_string()));
        form.validate();
        assert_eq!(form.error(Field::Email), None);
    }

    #[test]
    fn test_edit_clears_only_that_fields_error() {
        let mut form = FormController::new();
        form.submit();
        assert_eq!(form.errors().iter().count(), 6);

        form.update_field(FieldUpdate::Message("x".to_string()));
        assert_eq!(form.error(Field::Message), None);
        assert_eq!(form.error(Field::Name), Some(FieldError::NameRequired));
        assert_eq!(form.error(Field::Consent), Some(FieldError::ConsentRequired));
        assert_eq!(form.errors().iter().count(), 5);
        assert_eq!(form.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_edit_with_blank_value_still_clears_error() {
        let mut form = FormController::new();
        form.validate();
        form.update_field(FieldUpdate::Name("   ".to_string()));
        assert_eq!(form.error(Field::Name), None);
        assert_eq!(form.state().name, "   ");
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut form = FormController::new();
        form.update_field(FieldUpdate::Email("jane@".to_string()));
        form.update_field(FieldUpdate::Consent(true));

        form.validate();
        let first = form.errors().clone();
        let first_announcement = form.announcement().to_string();
        form.validate();

        assert_eq!(form.errors(), &first);
        assert_eq!(form.announcement(), first_announcement);
    }

    #[test]
    fn test_valid_validate_clears_announcement() {
        let mut form = FormController::new();
        form.validate();
        assert!(!form.announcement().is_empty());

        fill_valid(&mut form);
        assert!(form.validate());
        assert_eq!(form.announcement(), "");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_annotation_follows_own_error_slot() {
        let mut form = FormController::new();
        form.update_field(FieldUpdate::Email("jane@doe.com".to_string()));
        form.validate();

        assert_eq!(
            form.annotation(Field::Email),
            Annotation { invalid: false, described_by: None }
        );
        assert_eq!(
            form.annotation(Field::InquiryType),
            Annotation { invalid: true, described_by: Some("inquiryType-error") }
        );
        assert_eq!(
            form.annotation(Field::Consent),
            Annotation { invalid: true, described_by: Some("consent-error") }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_submit_resets_form_and_announces_success() {
        let mut form = FormController::new();
        fill_valid(&mut form);

        assert!(form.submit());
        assert_eq!(form.state(), &FormState::default());
        assert!(form.errors().is_empty());
        assert!(form.is_success());
        assert_eq!(form.announcement(), "Form submitted successfully.");
        assert_eq!(form.phase(), SubmissionPhase::SubmittedOk);
        assert!(form.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_window_lasts_four_seconds() {
        let mut form = FormController::new();
        fill_valid(&mut form);
        form.submit();

        tokio::time::sleep(SUCCESS_WINDOW - Duration::from_millis(1)).await;
        assert!(!form.tick());
        assert!(form.is_success());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(form.tick());
        assert!(!form.is_success());
        assert_eq!(form.announcement(), "");
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert!(!form.has_pending_reset());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_supersedes_pending_reset() {
        let mut form = FormController::new();
        fill_valid(&mut form);
        form.submit();

        tokio::time::sleep(Duration::from_millis(3000)).await;
        fill_valid(&mut form);
        assert!(form.submit());

        // The first window would have ended here
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!form.tick());
        assert!(form.is_success());
        assert_eq!(form.announcement(), "Form submitted successfully.");

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert!(form.tick());
        assert!(!form.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_resubmit_ends_success_window() {
        let mut form = FormController::new();
        fill_valid(&mut form);
        form.submit();

        assert!(!form.submit());
        assert!(!form.is_success());
        assert!(!form.has_pending_reset());
        assert_eq!(form.phase(), SubmissionPhase::Invalid);

        // The aborted reset must not wipe the error announcement
        tokio::time::sleep(SUCCESS_WINDOW * 2).await;
        assert!(!form.tick());
        assert!(form.announcement().starts_with("Name is required."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_firing_is_ignored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ResetTimer::default();

        let first = timer.schedule(Duration::from_millis(10), tx.clone());
        let second = timer.schedule(Duration::from_millis(10), tx.clone());
        assert_ne!(first, second);

        assert!(!timer.fire(first));
        assert!(timer.is_pending());

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.generation, second);
        assert!(timer.fire(fired.generation));
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_deadline_tracks_open_window() {
        let mut form = FormController::new();
        assert_eq!(form.reset_deadline(), None);

        fill_valid(&mut form);
        let submitted_at = tokio::time::Instant::now();
        form.submit();
        assert_eq!(form.reset_deadline(), Some(submitted_at + SUCCESS_WINDOW));

        tokio::time::sleep_until(submitted_at + SUCCESS_WINDOW + Duration::from_millis(1)).await;
        assert!(form.tick());
        assert_eq!(form.reset_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submit_clears_reset_deadline() {
        let mut form = FormController::new();
        fill_valid(&mut form);
        form.submit();
        assert!(form.reset_deadline().is_some());

        form.submit();
        assert_eq!(form.reset_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_aborts_reset() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut form = FormController::new();
        form.reset_tx = tx;
        fill_valid(&mut form);
        assert!(form.submit());
        assert!(form.has_pending_reset());
        drop(form);

        tokio::time::sleep(SUCCESS_WINDOW * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_aborts_reset() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = ResetTimer::default();
        timer.schedule(Duration::from_millis(10), tx.clone());
        drop(timer);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
