// ABOUTME: Single-consumer run loop wiring the event gate and interpreter to a room channel
// ABOUTME: Sends the startup greeting, then handles events strictly one at a time in arrival order

use crate::{
    gate::{Admission, EventGate},
    interpreter::{CommandInterpreter, Rule},
    metrics,
    session::SessionState,
    traits::{EventStream, InboundEvent, OutboundMessage, RoomChannel},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_stream::StreamExt;

/// Sent once on startup before any event is consumed
pub const GREETING: &str = "[.inder] Hey, I'm back!";

/// Result of handling one inbound event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Event was admitted, `Rule` fired, and its reply was sent
    Replied(Rule),
    /// Event was admitted but matched no rule
    Silent,
    /// Event was rejected by the gate
    Discarded(Admission),
}

/// The order bot. Owns the interpreter (and with it the session state), so
/// `&mut self` on `handle_event` is what serializes event processing.
pub struct OrderBot<C: RoomChannel> {
    channel: Arc<C>,
    gate: EventGate,
    interpreter: CommandInterpreter,
}

impl<C: RoomChannel> OrderBot<C> {
    /// Create a bot for `room_id`, using the channel's own user ID for self-exclusion
    pub fn new(channel: Arc<C>, room_id: impl Into<String>) -> Self {
        let gate = EventGate::new(room_id, channel.bot_user_id());
        Self {
            channel,
            gate,
            interpreter: CommandInterpreter::new(),
        }
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }

    pub fn state(&self) -> &SessionState {
        self.interpreter.state()
    }

    pub async fn send_greeting(&self) -> Result<()> {
        self.channel
            .send(self.gate.target_room_id(), OutboundMessage::plain(GREETING))
            .await
            .context("Failed to send greeting")?;
        metrics::record_message_sent();
        tracing::info!(room_id = %self.gate.target_room_id(), "Greeting sent");
        Ok(())
    }

    /// Gate, interpret, and reply to one event.
    ///
    /// A failed send is returned as an error after the session state has
    /// already been updated; the state never rolls back.
    pub async fn handle_event(
        &mut self,
        event: InboundEvent,
        now_millis: i64,
    ) -> Result<HandleResult> {
        let admission = self.gate.check(&event, now_millis);
        metrics::record_event(admission.as_str());

        if !admission.is_admitted() {
            tracing::debug!(
                room_id = %event.room_id,
                sender = %event.sender.id,
                event_id = %event.event_id,
                reason = admission.as_str(),
                "Discarding event"
            );
            return Ok(HandleResult::Discarded(admission));
        }

        tracing::info!("{} | {}", event.sender.label(), event.body);

        let Some(rule) = self.interpreter.evaluate(&event) else {
            return Ok(HandleResult::Silent);
        };
        metrics::record_rule(rule.name());

        tracing::debug!(
            rule = rule.name(),
            reply = rule.reply(),
            order_mode_active = self.state().order_mode_active,
            "Sending reply"
        );

        if let Err(e) = self
            .channel
            .send(self.gate.target_room_id(), rule.message())
            .await
        {
            metrics::record_error("send_reply");
            return Err(e.context("Failed to send reply"));
        }
        metrics::record_message_sent();

        Ok(HandleResult::Replied(rule))
    }

    /// Send the greeting, then consume `events` until the stream ends.
    ///
    /// Freshness is judged against each event's receive time, so events that
    /// waited in the queue behind a slow send are not counted as stale.
    pub async fn run(mut self, mut events: EventStream) -> Result<()> {
        self.send_greeting().await?;

        tracing::info!(
            room_id = %self.gate.target_room_id(),
            bot_user_id = %self.gate.self_user_id(),
            "Order bot listening"
        );

        while let Some(event) = events.next().await {
            let received_at = event.received_at_millis;
            if let Err(e) = self.handle_event(event, received_at).await {
                tracing::error!(error = %e, "Error handling event");
            }
        }

        tracing::info!("Event stream closed, order bot stopping");
        Ok(())
    }
}
