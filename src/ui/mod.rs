mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, TOAST_MESSAGE};
use crate::form::{Field, InquiryType, SubmissionPhase};
use crate::theme::Theme;

// Theme colors, set once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme used for drawing. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("Theme already initialised");
    }
}

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg() -> Color { theme().bg }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

/// Widest the form gets on large terminals
const FORM_MAX_WIDTH: u16 = 80;

const CONSENT_TEXT: &str = "I consent to being contacted by the team.";

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Name => "Your name",
        Field::LastName => "Your LastName",
        Field::Email => "you@example.com",
        Field::Message => "Write your message here...",
        Field::InquiryType | Field::Consent => "",
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Center the form horizontally, capped at FORM_MAX_WIDTH
    let width = area.width.min(FORM_MAX_WIDTH);
    let form_area = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(4), // Name + LastName (box + error)
            Constraint::Length(4), // Email
            Constraint::Length(4), // Query type
            Constraint::Min(5),    // Message
            Constraint::Length(2), // Consent
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Live region
            Constraint::Length(1), // Footer
        ])
        .split(form_area);

    draw_title(f, chunks[0]);
    draw_name_row(f, app, chunks[1]);
    draw_text_field(f, app, Field::Email, Focus::Email, chunks[2]);
    draw_inquiry_type(f, app, chunks[3]);
    draw_message(f, app, chunks[4]);
    draw_consent(f, app, chunks[5]);
    components::button(f, chunks[6], "Send Message", app.focus == Focus::Submit);
    draw_live_region(f, app, chunks[7]);
    draw_footer(f, app, chunks[8]);

    if app.form.is_success() {
        draw_toast(f, form_area);
    }
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Contact Us",
        Style::default().fg(header()).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, area);
}

/// Split a field's area into the input box and the error line below it
fn with_error_line(area: Rect) -> (Rect, Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    (parts[0], parts[1])
}

fn draw_name_row(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(area);

    draw_text_field(f, app, Field::Name, Focus::Name, columns[0]);
    draw_text_field(f, app, Field::LastName, Focus::LastName, columns[1]);
}

fn draw_text_field(f: &mut Frame, app: &App, field: Field, focus: Focus, area: Rect) {
    let (input_area, error_area) = with_error_line(area);
    let value = app.form.state().text(field).unwrap_or_default();

    components::text_input(
        f,
        input_area,
        field.label(),
        value,
        placeholder(field),
        app.focus == focus,
        app.form.annotation(field),
    );
    components::error_line(f, error_area, app.form.error(field));
}

fn draw_inquiry_type(f: &mut Frame, app: &App, area: Rect) {
    let (box_area, error_area) = with_error_line(area);
    let annotation = app.form.annotation(Field::InquiryType);
    let focused = matches!(app.focus, Focus::GeneralInquiry | Focus::SupportRequest);
    let selected = app.form.state().inquiry_type;

    let mut spans = Vec::new();
    for (kind, stop) in [
        (InquiryType::GeneralInquiry, Focus::GeneralInquiry),
        (InquiryType::SupportRequest, Focus::SupportRequest),
    ] {
        let option = components::radio(
            kind.label(),
            selected == Some(kind),
            app.focus == stop,
            annotation.invalid,
        );
        spans.extend(option.spans);
        spans.push(Span::raw("    "));
    }

    let block = components::field_block(Field::InquiryType.label(), focused, annotation);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), box_area);
    components::error_line(f, error_area, app.form.error(Field::InquiryType));
}

fn draw_message(f: &mut Frame, app: &App, area: Rect) {
    let (input_area, error_area) = with_error_line(area);

    components::text_area(
        f,
        input_area,
        Field::Message.label(),
        &app.form.state().message,
        placeholder(Field::Message),
        app.focus == Focus::Message,
        app.form.annotation(Field::Message),
    );
    components::error_line(f, error_area, app.form.error(Field::Message));
}

fn draw_consent(f: &mut Frame, app: &App, area: Rect) {
    let (line_area, error_area) = with_error_line(area);
    let annotation = app.form.annotation(Field::Consent);

    let mut line = components::checkbox(
        CONSENT_TEXT,
        app.form.state().consent,
        app.focus == Focus::Consent,
        annotation.invalid,
    );
    line.spans.push(Span::styled(" *", Style::default().fg(accent())));

    f.render_widget(Paragraph::new(line), line_area);
    components::error_line(f, error_area, app.form.error(Field::Consent));
}

/// Polite live region: the current announcement only
fn draw_live_region(f: &mut Frame, app: &App, area: Rect) {
    let announcement = app.form.announcement();

    let line = if !announcement.is_empty() {
        let color = match app.form.phase() {
            SubmissionPhase::SubmittedOk => success(),
            _ => danger(),
        };
        Line::from(Span::styled(announcement, Style::default().fg(color)))
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    };

    f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    // A transient status takes the hint row until it expires
    if let Some(ref status) = app.status_message {
        let line = Line::from(Span::styled(status.as_str(), Style::default().fg(danger())));
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
        return;
    }

    let action = match app.focus {
        Focus::Name | Focus::LastName | Focus::Email => ("Enter", "Send"),
        Focus::Message => ("Enter", "Newline"),
        Focus::GeneralInquiry | Focus::SupportRequest | Focus::Consent => ("Space", "Select"),
        Focus::Submit => ("Enter", "Send"),
    };
    let hints = [
        ("Tab/↑↓", "Move"),
        action,
        ("Ctrl+S", "Send"),
        ("Esc", "Quit"),
    ];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 50 { 2 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

/// Assertive success toast in the top-right corner of the form
fn draw_toast(f: &mut Frame, area: Rect) {
    let width = (TOAST_MESSAGE.chars().count() as u16 + 4).min(area.width);
    let height = 3u16.min(area.height);
    let toast_area = Rect {
        x: area.right().saturating_sub(width),
        y: area.y,
        width,
        height,
    };

    f.render_widget(Clear, toast_area);

    let toast = Paragraph::new(Span::styled(
        TOAST_MESSAGE,
        Style::default().fg(bg()).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .style(Style::default().bg(success()))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(success()).bg(success())),
    );

    f.render_widget(toast, toast_area);
}
