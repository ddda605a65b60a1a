//! Conversation area
//!
//! Displays the active room's log pinned to the newest message, the
//! connection banner and the typing indicator.

use campus_app::{App, Banner, Message};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const BORDER_SIZE: u16 = 2;
const TYPING_TEXT: &str = "Someone is typing...";

/// Render the conversation area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(conversation) = app.conversation() else {
        let block = Block::default().borders(Borders::ALL).title(" Conversation ");
        let placeholder = Paragraph::new("Select a chat to start messaging")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let title = app
        .rooms()
        .iter()
        .find(|room| &room.id == conversation.room_id())
        .map_or_else(|| format!(" Room {} ", conversation.room_id()), |room| {
            format!(" {} ", room.display_name())
        });
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner = app.banner();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(u16::from(banner.is_some())),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
    let [banner_area, log_area, typing_area] = chunks.as_ref() else {
        return;
    };

    if let Some(banner) = banner {
        render_banner(frame, banner, *banner_area);
    }

    let self_label = app.self_label();
    let items: Vec<ListItem> = if conversation.is_loading() {
        vec![ListItem::new(Span::styled("Loading messages...", Style::default().fg(Color::DarkGray)))]
    } else {
        conversation.messages().iter().map(|msg| message_item(msg, self_label, log_area.width)).collect()
    };

    // Pinned to the newest message
    let visible_height = log_area.height as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();
    frame.render_widget(List::new(visible_items), *log_area);

    if conversation.is_typing() {
        let typing = Paragraph::new(Span::styled(
            TYPING_TEXT,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(typing, *typing_area);
    }
}

fn render_banner(frame: &mut Frame, banner: Banner, area: Rect) {
    let color = match banner {
        Banner::Connecting => Color::Yellow,
        Banner::Disconnected => Color::Red,
    };
    let paragraph = Paragraph::new(banner.text())
        .style(Style::default().fg(Color::Black).bg(color))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// One log line. Own messages are right-aligned, others left-aligned with the
/// sender in front.
fn message_item(msg: &Message, self_label: &str, width: u16) -> ListItem<'static> {
    let time = msg.local_time().unwrap_or_default();
    let dim = Style::default().fg(Color::DarkGray);

    if msg.is_own(self_label) {
        let text = format!("{} {time}", msg.content);
        let pad = (width as usize).saturating_sub(text.chars().count());
        return ListItem::new(Line::from(vec![
            Span::raw(" ".repeat(pad)),
            Span::styled(msg.content.clone(), Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::styled(time, dim),
        ]));
    }

    ListItem::new(Line::from(vec![
        Span::styled(
            msg.sender.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(": "),
        Span::raw(msg.content.clone()),
        Span::raw(" "),
        Span::styled(time, dim),
    ]))
}
