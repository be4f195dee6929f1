// ABOUTME: Core types and the RoomChannel trait shared by the bot and its transports
// ABOUTME: Defines InboundEvent (received), OutboundMessage (sent), and the event stream type

use anyhow::Result;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

// =============================================================================
// Message Types
// =============================================================================

/// Plain text reply sent back into the room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub body: String,
}

impl OutboundMessage {
    pub fn plain(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// Identity of a room member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatUser {
    /// Unique identifier (e.g., @user:matrix.org)
    pub id: String,
    /// Display name
    pub display_name: Option<String>,
}

impl ChatUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    pub fn with_name(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: Some(name.into()),
        }
    }

    /// Display name if the room knows one, otherwise the raw ID
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// One text message received in a room
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// The room this event occurred in
    pub room_id: String,
    /// The user who sent the message
    pub sender: ChatUser,
    /// Literal text content
    pub body: String,
    /// Platform-specific event ID
    pub event_id: String,
    /// Server-assigned emission time in milliseconds since Unix epoch
    pub server_timestamp_millis: i64,
    /// Local clock when the transport received the event, in epoch milliseconds
    pub received_at_millis: i64,
}

// =============================================================================
// Room Channel
// =============================================================================

/// Boxed stream type for inbound room events
pub type EventStream = Pin<Box<dyn Stream<Item = InboundEvent> + Send>>;

/// Transport the bot rides on: an inbound event stream plus an outbound send.
///
/// Implementations deliver events at-least-once in arrival order. Sends are
/// fire-and-forget from the bot's point of view; a failure is reported back
/// but never retried.
#[async_trait]
pub trait RoomChannel: Send + Sync {
    /// Receive inbound events as a stream
    async fn event_stream(&self) -> Result<EventStream>;

    /// Send a plain text message to a room by ID
    async fn send(&self, room_id: &str, message: OutboundMessage) -> Result<()>;

    /// Bot's own user ID on this transport
    fn bot_user_id(&self) -> &str;
}
