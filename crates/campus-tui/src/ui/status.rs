//! Status bar
//!
//! Displays connection status, the active chat and the latest status message.

use campus_app::{App, DataSource};
use campus_client::ConnectionState;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match (app.config().source, app.connection_state()) {
        (DataSource::Fixtures, _) => Span::styled("Offline (sample data)", Style::default().fg(Color::Cyan)),
        (DataSource::Remote, None) => Span::styled("Idle", Style::default().fg(Color::Gray)),
        (DataSource::Remote, Some(ConnectionState::Connecting)) => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        (DataSource::Remote, Some(ConnectionState::Open)) => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (DataSource::Remote, Some(ConnectionState::Closed | ConnectionState::Errored)) => {
            Span::styled("Disconnected (F5 to reconnect)", Style::default().fg(Color::Red))
        },
    };

    let room_info = app.conversation().map_or_else(String::new, |c| {
        format!(" | Room: {} | Messages: {}", c.room_id(), c.messages().len())
    });
    let status_message =
        app.status_message().map_or_else(String::new, |message| format!(" | {message}"));

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::raw(room_info),
        Span::raw(status_message),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
