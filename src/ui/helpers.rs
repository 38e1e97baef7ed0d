use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error: the outermost
/// context followed by the root cause.
pub(crate) fn surface_error(err: &Error) -> String {
    match err.chain().last() {
        Some(cause) if err.chain().count() > 1 => format!("{err}: {cause}"),
        _ => err.to_string(),
    }
}

/// One numbered row of a listing. The status label is colored so read and
/// unread books are easy to tell apart.
pub(crate) fn book_line(position: usize, book: &Book) -> Line<'static> {
    let status_style = if book.read {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(
            format!("{position}. "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{} by {} ({}) - {} - ",
            book.title, book.author, book.year, book.genre
        )),
        Span::styled(book.status_label(), status_style),
    ])
}

/// Key hint span pair used in the footer, e.g. `[Enter] Save`.
pub(crate) fn key_hint(key: &str, action: &str) -> [Span<'static>; 2] {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    [
        Span::styled(format!("[{key}]"), key_style),
        Span::raw(format!(" {action}   ")),
    ]
}
