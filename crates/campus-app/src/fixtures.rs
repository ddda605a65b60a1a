//! Sample data for [`DataSource::Fixtures`](crate::DataSource::Fixtures).

use campus_proto::{MessageRecord, RoomId, RoomSummary, WireId};

/// Sample room list.
pub fn rooms() -> Vec<RoomSummary> {
    vec![
        RoomSummary {
            id: RoomId::from(1),
            user: Some("Alice".into()),
            last_message: Some("Hey, is this still available?".into()),
            timestamp: Some("2025-08-19T10:00:00Z".into()),
        },
        RoomSummary {
            id: RoomId::from(2),
            user: Some("Bob".into()),
            last_message: Some("Can you lower the price?".into()),
            timestamp: Some("2025-08-19T09:45:00Z".into()),
        },
    ]
}

/// Sample history, identical for every room.
pub fn messages() -> Vec<MessageRecord> {
    vec![
        MessageRecord {
            id: Some(WireId::Number(1)),
            sender: "Alice".into(),
            content: "Hi, is this available?".into(),
            timestamp: "2025-08-19T10:00:00Z".into(),
        },
        MessageRecord {
            id: Some(WireId::Number(2)),
            sender: "You".into(),
            content: "Yes, it is!".into(),
            timestamp: "2025-08-19T10:01:00Z".into(),
        },
    ]
}
