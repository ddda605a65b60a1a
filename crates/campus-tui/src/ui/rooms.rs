//! Chat list sidebar
//!
//! Displays the fetched rooms with their counterparty and last message.

use campus_app::{App, RoomList};
use campus_proto::timestamp;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const ACTIVE_PREFIX: &str = "> ";
const INACTIVE_PREFIX: &str = "  ";

/// Render the chat list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let items: Vec<ListItem> = match app.room_list() {
        RoomList::Loading => vec![ListItem::new(Span::styled("Loading chats...", dim))],
        RoomList::Ready(rooms) if rooms.is_empty() => {
            vec![ListItem::new(Span::styled("No chats available", dim))]
        },
        RoomList::Ready(rooms) => rooms
            .iter()
            .map(|room| {
                let active = app.active_room() == Some(&room.id);
                let (prefix, name_style) = if active {
                    (ACTIVE_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                } else {
                    (INACTIVE_PREFIX, Style::default().add_modifier(Modifier::BOLD))
                };
                let time =
                    room.timestamp.as_deref().and_then(timestamp::local_clock).unwrap_or_default();

                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(prefix),
                        Span::styled(room.display_name(), name_style),
                        Span::raw(" "),
                        Span::styled(time, dim),
                    ]),
                    Line::from(vec![Span::raw(INACTIVE_PREFIX), Span::styled(room.preview(), dim)]),
                ])
            })
            .collect(),
    };

    let block = Block::default().borders(Borders::ALL).title(" Chats ");
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
