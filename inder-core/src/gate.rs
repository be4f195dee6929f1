// ABOUTME: Event admission filter deciding which inbound events the bot acts on
// ABOUTME: Rejects events from other rooms, from the bot itself, and older than the staleness window

use crate::traits::InboundEvent;

/// Events older than this are backlog (e.g. replayed on join or reconnect)
pub const STALENESS_WINDOW_MILLIS: i64 = 30_000;

/// Outcome of checking an event against the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    ForeignRoom,
    OwnMessage,
    Stale,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }

    /// Short label used in logs and metrics
    pub fn as_str(self) -> &'static str {
        match self {
            Admission::Admitted => "admitted",
            Admission::ForeignRoom => "foreign_room",
            Admission::OwnMessage => "own_message",
            Admission::Stale => "stale",
        }
    }
}

/// Gate bound to one target room and one bot identity
#[derive(Debug, Clone)]
pub struct EventGate {
    target_room_id: String,
    self_user_id: String,
}

impl EventGate {
    pub fn new(target_room_id: impl Into<String>, self_user_id: impl Into<String>) -> Self {
        Self {
            target_room_id: target_room_id.into(),
            self_user_id: self_user_id.into(),
        }
    }

    pub fn target_room_id(&self) -> &str {
        &self.target_room_id
    }

    pub fn self_user_id(&self) -> &str {
        &self.self_user_id
    }

    /// Classify an event. Checks run in order: room, sender, freshness.
    pub fn check(&self, event: &InboundEvent, now_millis: i64) -> Admission {
        if event.room_id != self.target_room_id {
            return Admission::ForeignRoom;
        }
        if event.sender.id == self.self_user_id {
            return Admission::OwnMessage;
        }
        // Inclusive boundary; future timestamps count as fresh
        if now_millis.saturating_sub(event.server_timestamp_millis) > STALENESS_WINDOW_MILLIS {
            return Admission::Stale;
        }
        Admission::Admitted
    }

    pub fn admit(&self, event: &InboundEvent, now_millis: i64) -> bool {
        self.check(event, now_millis).is_admitted()
    }
}

/// Pure predicate form of the gate
pub fn admit(
    event: &InboundEvent,
    target_room_id: &str,
    self_user_id: &str,
    now_millis: i64,
) -> bool {
    EventGate::new(target_room_id, self_user_id).admit(event, now_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatUser;

    fn event(room: &str, sender: &str, ts: i64) -> InboundEvent {
        InboundEvent {
            room_id: room.to_string(),
            sender: ChatUser::new(sender),
            body: ".inder".to_string(),
            event_id: "$evt".to_string(),
            server_timestamp_millis: ts,
            received_at_millis: ts,
        }
    }

    #[test]
    fn test_room_check_runs_before_sender_check() {
        let gate = EventGate::new("!room:test.com", "@bot:test.com");
        let ev = event("!other:test.com", "@bot:test.com", 0);
        assert_eq!(gate.check(&ev, 0), Admission::ForeignRoom);
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let gate = EventGate::new("!room:test.com", "@bot:test.com");
        let ev = event("!room:test.com", "@alice:test.com", 5_000);
        assert!(gate.admit(&ev, 1_000));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let gate = EventGate::new("!room:test.com", "@bot:test.com");
        let ancient = event("!room:test.com", "@alice:test.com", i64::MIN);
        assert_eq!(gate.check(&ancient, 1_000), Admission::Stale);

        let far_future = event("!room:test.com", "@alice:test.com", i64::MAX);
        assert_eq!(gate.check(&far_future, -1_000), Admission::Admitted);
    }

    #[test]
    fn test_admission_labels() {
        assert_eq!(Admission::Admitted.as_str(), "admitted");
        assert_eq!(Admission::Stale.as_str(), "stale");
        assert!(!Admission::OwnMessage.is_admitted());
    }
}
