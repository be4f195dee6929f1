// ABOUTME: Matrix transport for the order bot, wrapping a logged-in matrix_sdk Client
// ABOUTME: Implements RoomChannel by forwarding m.text events into a bounded queue and sending plain text

use anyhow::{Context, Result};
use async_trait::async_trait;
use inder_core::traits::{ChatUser, EventStream, InboundEvent, OutboundMessage, RoomChannel};
use matrix_sdk::{
    room::Room,
    ruma::{
        events::room::message::{
            MessageType, OriginalSyncRoomMessageEvent, RoomMessageEventContent,
        },
        OwnedRoomId, RoomId,
    },
    Client, RoomState,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Capacity of the queue between the sync loop and the bot
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Matrix-specific implementation of RoomChannel
pub struct MatrixRoomChannel {
    client: Client,
    /// Cached user ID - stored at construction to avoid Option handling
    user_id: String,
}

impl MatrixRoomChannel {
    /// Create a channel from a logged-in client
    pub fn new(client: Client) -> Result<Self> {
        let user_id = client
            .user_id()
            .context("MatrixRoomChannel requires a logged-in client")?
            .to_string();
        Ok(Self { client, user_id })
    }

    fn parse_room_id(room_id: &str) -> Result<OwnedRoomId> {
        room_id
            .parse()
            .with_context(|| format!("Invalid room ID: {}", room_id))
    }

    /// Join the room unless the bot is already a member
    pub async fn ensure_joined(&self, room_id: &str) -> Result<()> {
        let room_id = Self::parse_room_id(room_id)?;
        if let Some(room) = self.client.get_room(&room_id) {
            if room.state() == RoomState::Joined {
                return Ok(());
            }
        }

        tracing::info!(room_id = %room_id, "Joining target room");
        self.client
            .join_room_by_id(&room_id)
            .await
            .context("Failed to join room")?;
        Ok(())
    }

    /// Register the message handler and return a receiver for inbound events.
    /// Only original m.text events are forwarded; filtering is left to the gate.
    pub fn setup_event_stream(&self) -> mpsc::Receiver<InboundEvent> {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);

        self.client
            .add_event_handler(move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let tx = tx.clone();
                async move {
                    let received_at_millis = chrono::Utc::now().timestamp_millis();
                    if !matches!(event.content.msgtype, MessageType::Text(_)) {
                        return;
                    }

                    let display_name = room
                        .get_member(&event.sender)
                        .await
                        .ok()
                        .flatten()
                        .and_then(|m| m.display_name().map(|n| n.to_string()));

                    let Some(inbound) =
                        to_inbound(room.room_id(), &event, display_name, received_at_millis)
                    else {
                        return;
                    };

                    if tx.send(inbound).await.is_err() {
                        tracing::warn!("Event stream receiver dropped");
                    }
                }
            });

        rx
    }
}

/// Convert an original room message into an `InboundEvent`.
/// Returns `None` for anything but `m.text`.
fn to_inbound(
    room_id: &RoomId,
    event: &OriginalSyncRoomMessageEvent,
    display_name: Option<String>,
    received_at_millis: i64,
) -> Option<InboundEvent> {
    let MessageType::Text(text) = &event.content.msgtype else {
        return None;
    };

    let millis: u64 = event.origin_server_ts.0.into();

    Some(InboundEvent {
        room_id: room_id.to_string(),
        sender: ChatUser {
            id: event.sender.to_string(),
            display_name,
        },
        body: text.body.clone(),
        event_id: event.event_id.to_string(),
        server_timestamp_millis: i64::try_from(millis).unwrap_or(i64::MAX),
        received_at_millis,
    })
}

impl std::fmt::Debug for MatrixRoomChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixRoomChannel")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[async_trait]
impl RoomChannel for MatrixRoomChannel {
    async fn event_stream(&self) -> Result<EventStream> {
        let rx = self.setup_event_stream();
        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn send(&self, room_id: &str, message: OutboundMessage) -> Result<()> {
        let room_id = Self::parse_room_id(room_id)?;
        let room = self
            .client
            .get_room(&room_id)
            .with_context(|| format!("Room not found: {}", room_id))?;

        room.send(RoomMessageEventContent::text_plain(message.body))
            .await
            .context("Failed to send message")?;

        Ok(())
    }

    fn bot_user_id(&self) -> &str {
        &self.user_id
    }
}
