//! Reusable form widgets: bordered inputs, choice rows, error lines and
//! the submit button

use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{accent, bg_selected, danger, inactive, text, text_dim};
use crate::form::{Annotation, FieldError};

/// Border and title style for a field, by focus and validity
pub fn field_block(label: &str, focused: bool, annotation: Annotation) -> Block<'static> {
    let border_color = if annotation.invalid {
        danger()
    } else if focused {
        accent()
    } else {
        inactive()
    };
    let title_style = if focused {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(text())
    };

    Block::default()
        .title(Line::from(vec![
            Span::styled(format!(" {} ", label), title_style),
            Span::styled("* ", Style::default().fg(accent())),
        ]))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// Last part of `value` that fits into `width` columns
fn visible_tail(value: &str, width: usize) -> &str {
    let count = value.chars().count();
    if count <= width {
        return value;
    }
    let skip = count - width;
    let start = value
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    &value[start..]
}

/// Single-line text input. Shows the placeholder while empty and puts the
/// cursor at the end of the value when focused.
pub fn text_input(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    annotation: Annotation,
) {
    let block = field_block(label, focused, annotation);
    let inner = block.inner(area);
    let width = inner.width.saturating_sub(1) as usize;

    let shown = visible_tail(value, width);
    let line = if value.is_empty() {
        Line::from(Span::styled(placeholder.to_string(), Style::default().fg(text_dim())))
    } else {
        Line::from(Span::styled(shown.to_string(), Style::default().fg(text())))
    };

    f.render_widget(Paragraph::new(line).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x + shown.chars().count() as u16;
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

/// Multi-line text area, wrapped, scrolled so the end stays visible
pub fn text_area(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
    annotation: Annotation,
) {
    let block = field_block(label, focused, annotation);
    let inner = block.inner(area);

    if value.is_empty() {
        let hint = Paragraph::new(Span::styled(placeholder.to_string(), Style::default().fg(text_dim())))
            .block(block);
        f.render_widget(hint, area);
        if focused && inner.width > 0 && inner.height > 0 {
            f.set_cursor_position(Position::new(inner.x, inner.y));
        }
        return;
    }

    // Hard-wrap by character so the cursor position is predictable
    let width = inner.width.max(1) as usize;
    let rows = wrap_rows(value, width);

    let height = inner.height.max(1) as usize;
    let scroll = rows.len().saturating_sub(height);
    let lines: Vec<Line> = rows[scroll..]
        .iter()
        .map(|r| Line::from(Span::styled(r.clone(), Style::default().fg(text()))))
        .collect();
    let cursor_row = rows.len() - 1 - scroll;
    let cursor_col = rows.last().map(|r| r.chars().count()).unwrap_or(0);

    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position(Position::new(
            inner.x + cursor_col as u16,
            inner.y + cursor_row as u16,
        ));
    }
}

/// Split `value` into rows of at most `width` characters. A full final row
/// is followed by an empty one so the cursor has somewhere to go.
fn wrap_rows(value: &str, width: usize) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    for line in value.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    if rows.last().is_some_and(|r| r.chars().count() >= width) {
        rows.push(String::new());
    }
    rows
}

/// One option of an exclusive choice
pub fn radio(label: &str, checked: bool, focused: bool, invalid: bool) -> Line<'static> {
    let mark = if checked { "(•) " } else { "( ) " };
    choice_line(mark, label, checked, focused, invalid)
}

pub fn checkbox(label: &str, checked: bool, focused: bool, invalid: bool) -> Line<'static> {
    let mark = if checked { "[x] " } else { "[ ] " };
    choice_line(mark, label, checked, focused, invalid)
}

fn choice_line(mark: &str, label: &str, checked: bool, focused: bool, invalid: bool) -> Line<'static> {
    let mark_color = if invalid {
        danger()
    } else if checked || focused {
        accent()
    } else {
        inactive()
    };
    let mut label_style = Style::default().fg(text());
    if focused {
        label_style = label_style.add_modifier(Modifier::BOLD).bg(bg_selected());
    }

    Line::from(vec![
        Span::styled(mark.to_string(), Style::default().fg(mark_color)),
        Span::styled(label.to_string(), label_style),
    ])
}

/// Error text under a field, blank when the field is valid
pub fn error_line(f: &mut Frame, area: Rect, error: Option<FieldError>) {
    if let Some(err) = error {
        let line = Paragraph::new(Span::styled(err.to_string(), Style::default().fg(danger())))
            .wrap(Wrap { trim: true });
        f.render_widget(line, area);
    }
}

pub fn button(f: &mut Frame, area: Rect, label: &str, focused: bool) {
    let (border, style) = if focused {
        (
            accent(),
            Style::default().fg(accent()).bg(bg_selected()).add_modifier(Modifier::BOLD),
        )
    } else {
        (inactive(), Style::default().fg(text()))
    };

    let button = Paragraph::new(Span::styled(label.to_string(), style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(button, area);
}
