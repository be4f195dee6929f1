// ABOUTME: In-memory session state tracked across admitted events for one bot run
// ABOUTME: Holds the order mode flag and the last admitted body, plus a derived phase view

use crate::commands::Command;

/// Conversation phase derived from `SessionState`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OrderModeActive,
    /// The previous admitted body was `.cancel`; a `Y` now confirms.
    /// Takes priority over the order mode flag.
    AwaitingCancelConfirmation,
}

/// Session state for the lifetime of the process. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub order_mode_active: bool,
    pub last_message_body: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the previous admitted event primed a cancel confirmation
    pub fn awaiting_cancel_confirmation(&self) -> bool {
        self.last_message_body == Command::CANCEL
    }

    pub fn phase(&self) -> Phase {
        if self.awaiting_cancel_confirmation() {
            Phase::AwaitingCancelConfirmation
        } else if self.order_mode_active {
            Phase::OrderModeActive
        } else {
            Phase::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = SessionState::new();
        assert!(!state.order_mode_active);
        assert_eq!(state.last_message_body, "");
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_phase_follows_last_body() {
        let mut state = SessionState {
            order_mode_active: true,
            last_message_body: ".cancel".to_string(),
        };
        assert_eq!(state.phase(), Phase::AwaitingCancelConfirmation);

        state.last_message_body = "hello".to_string();
        assert_eq!(state.phase(), Phase::OrderModeActive);
    }
}
