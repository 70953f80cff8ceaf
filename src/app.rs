use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::form::{Field, FieldUpdate, FormController, InquiryType};

/// Text of the toast shown while the success window is open
pub const TOAST_MESSAGE: &str = "Message sent successfully!";

/// How long transient status messages stay visible, in seconds
const STATUS_SECONDS: u64 = 3;

/// Focus stops, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    LastName,
    Email,
    GeneralInquiry,
    SupportRequest,
    Message,
    Consent,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 8] = [
        Focus::Name,
        Focus::LastName,
        Focus::Email,
        Focus::GeneralInquiry,
        Focus::SupportRequest,
        Focus::Message,
        Focus::Consent,
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let pos = self.position();
        Self::ORDER[pos.checked_sub(1).unwrap_or(Self::ORDER.len() - 1)]
    }

    /// The form field this stop edits, if any
    pub fn field(self) -> Option<Field> {
        match self {
            Focus::Name => Some(Field::Name),
            Focus::LastName => Some(Field::LastName),
            Focus::Email => Some(Field::Email),
            Focus::GeneralInquiry | Focus::SupportRequest => Some(Field::InquiryType),
            Focus::Message => Some(Field::Message),
            Focus::Consent => Some(Field::Consent),
            Focus::Submit => None,
        }
    }

    fn inquiry_type(self) -> Option<InquiryType> {
        match self {
            Focus::GeneralInquiry => Some(InquiryType::GeneralInquiry),
            Focus::SupportRequest => Some(InquiryType::SupportRequest),
            _ => None,
        }
    }
}

pub struct App {
    pub form: FormController,
    pub focus: Focus,

    // Config
    pub config: AppConfig,

    // Status message (shown in the footer row, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            form: FormController::new(),
            focus: Focus::Name,
            config,
            status_message: None,
            status_message_time: None,
        }
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// How long the event loop may block before the next tick
    ///
    /// Never past the pending reset, so the success window closes on time
    /// whatever the configured tick rate.
    pub fn poll_timeout(&self, tick_rate: Duration) -> Duration {
        match self.form.reset_deadline() {
            Some(deadline) => {
                let left = deadline.saturating_duration_since(tokio::time::Instant::now());
                tick_rate.min(left).max(Duration::from_millis(1))
            }
            None => tick_rate,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // AltGr arrives as Ctrl+Alt and must still type its character
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && !key.modifiers.contains(KeyModifiers::ALT)
        {
            if key.code == KeyCode::Char('s') {
                self.submit();
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::Name | Focus::LastName | Focus::Email | Focus::Message => {
                    self.handle_text_key(key);
                }
                Focus::GeneralInquiry | Focus::SupportRequest => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        self.select_inquiry_type();
                    }
                }
                Focus::Consent => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        let consent = !self.form.state().consent;
                        self.form.update_field(FieldUpdate::Consent(consent));
                    }
                }
                Focus::Submit => {
                    if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                        self.submit();
                    }
                }
            },
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let Some(field) = self.focus.field() else {
            return;
        };

        match key.code {
            // Enter in the message area is a newline; elsewhere it submits
            KeyCode::Enter if field == Field::Message => self.edit_text(field, |v| v.push('\n')),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.edit_text(field, |v| {
                v.pop();
            }),
            KeyCode::Char(c) if !c.is_control() => self.edit_text(field, |v| v.push(c)),
            _ => {}
        }
    }

    /// Apply `edit` to a text field's current value, sending an update only
    /// when the value actually changes
    fn edit_text(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        let current = self.form.state().text(field).unwrap_or_default();
        let mut value = current.to_string();
        edit(&mut value);

        if value != current {
            if let Some(update) = FieldUpdate::text(field, value) {
                self.form.update_field(update);
            }
        }
    }

    fn select_inquiry_type(&mut self) {
        let Some(kind) = self.focus.inquiry_type() else {
            return;
        };
        // Re-selecting the checked option is not a change
        if self.form.state().inquiry_type != Some(kind) {
            self.form
                .update_field(FieldUpdate::InquiryType(Some(kind)));
        }
    }

    fn submit(&mut self) {
        if !self.form.submit() {
            tracing::debug!(
                errors = self.form.errors().iter().count(),
                "Submission rejected"
            );
            return;
        }

        tracing::info!("Contact message accepted");
        if self.config.notifications {
            // The message stays accepted; only the desktop popup is lost
            if let Err(e) = notify("contactform", TOAST_MESSAGE) {
                tracing::warn!("Desktop notification failed: {}", e);
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    pub fn tick(&mut self) {
        if self.form.tick() {
            tracing::debug!("Success window closed");
        }

        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("mail-send")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::controller::SUCCESS_WINDOW;
    use crate::form::{FieldError, SubmissionPhase};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn fill_valid(app: &mut App) {
        type_str(app, "Jane");
        press(app, KeyCode::Tab);
        type_str(app, "Doe");
        press(app, KeyCode::Tab);
        type_str(app, "jane@doe.com");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Char(' '));
        focus(app, Focus::Message);
        type_str(app, "Hi");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Char(' '));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn focus(app: &mut App, target: Focus) {
        while app.focus != target {
            press(app, KeyCode::Tab);
        }
    }

    #[test]
    fn test_focus_ring_wraps_both_ways() {
        assert_eq!(Focus::Submit.next(), Focus::Name);
        assert_eq!(Focus::Name.prev(), Focus::Submit);
        assert_eq!(Focus::Email.next(), Focus::GeneralInquiry);
        assert_eq!(Focus::Message.prev(), Focus::SupportRequest);

        let mut app = App::new(AppConfig::default());
        for _ in 0..Focus::ORDER.len() {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focus, Focus::Name);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Submit);
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut app = App::new(AppConfig::default());
        type_str(&mut app, "Jane ");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Doe");

        assert_eq!(app.form.state().name, "Jane");
        assert_eq!(app.form.state().last_name, "Doe");
    }

    #[test]
    fn test_enter_in_message_inserts_newline() {
        let mut app = App::new(AppConfig::default());
        focus(&mut app, Focus::Message);
        type_str(&mut app, "Hi");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "there");

        assert_eq!(app.form.state().message, "Hi\nthere");
        assert_eq!(app.form.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_enter_in_text_field_submits() {
        let mut app = App::new(AppConfig::default());
        type_str(&mut app, "Jane");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.phase(), SubmissionPhase::Invalid);
        assert_eq!(app.form.state().name, "Jane");
        assert_eq!(app.form.error(Field::LastName), Some(FieldError::LastNameRequired));
    }

    #[test]
    fn test_backspace_on_empty_field_keeps_error() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.form.error(Field::Name), Some(FieldError::NameRequired));

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.error(Field::Name), Some(FieldError::NameRequired));

        type_str(&mut app, "J");
        assert_eq!(app.form.error(Field::Name), None);
        assert_eq!(app.form.error(Field::Email), Some(FieldError::EmailRequired));
    }

    #[test]
    fn test_radio_and_consent_keys() {
        let mut app = App::new(AppConfig::default());
        focus(&mut app, Focus::SupportRequest);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.form.state().inquiry_type, Some(InquiryType::SupportRequest));

        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form.state().inquiry_type, Some(InquiryType::GeneralInquiry));

        focus(&mut app, Focus::Consent);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.state().consent);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.form.state().consent);
    }

    #[test]
    fn test_ctrl_alt_types_altgr_character() {
        let mut app = App::new(AppConfig::default());
        focus(&mut app, Focus::Email);
        type_str(&mut app, "jane");
        app.handle_key(KeyEvent::new(
            KeyCode::Char('@'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        ));
        type_str(&mut app, "doe.com");

        assert_eq!(app.form.state().email, "jane@doe.com");
        assert_eq!(app.form.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_ctrl_alt_s_does_not_submit() {
        let mut app = App::new(AppConfig::default());
        app.handle_key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        ));

        assert_eq!(app.form.state().name, "s");
        assert_eq!(app.form.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_poll_timeout_is_tick_rate_without_pending_reset() {
        let app = App::new(AppConfig::default());
        let tick_rate = Duration::from_millis(250);
        assert_eq!(app.poll_timeout(tick_rate), tick_rate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_closes_on_time_with_slow_tick_rate() {
        let config = AppConfig {
            tick_rate_ms: 10_000,
            ..AppConfig::default()
        };
        let tick_rate = Duration::from_millis(config.tick_rate_ms);
        let mut app = App::new(config);
        fill_valid(&mut app);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.form.is_success());

        // One loop iteration: block for the poll timeout, then tick
        let timeout = app.poll_timeout(tick_rate);
        assert!(timeout <= SUCCESS_WINDOW);
        tokio::time::sleep(timeout + Duration::from_millis(1)).await;
        app.tick();

        assert!(!app.form.is_success());
        assert_eq!(app.poll_timeout(tick_rate), tick_rate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_keyboard_submission() {
        let mut app = App::new(AppConfig::default());
        fill_valid(&mut app);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);

        assert!(app.form.is_success());
        assert_eq!(app.form.announcement(), "Form submitted successfully.");
        assert_eq!(app.form.state().name, "");

        tokio::time::sleep(SUCCESS_WINDOW + Duration::from_millis(1)).await;
        app.tick();
        assert!(!app.form.is_success());
        assert_eq!(app.form.announcement(), "");
    }
}
