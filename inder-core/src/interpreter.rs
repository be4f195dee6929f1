// ABOUTME: Stateful command interpreter driving the order mode conversation
// ABOUTME: Evaluates an ordered rule list per admitted event and records the body afterwards

use crate::{
    commands::{parse_command, Command},
    session::SessionState,
    traits::{InboundEvent, OutboundMessage},
};

pub const REPLY_ORDER_MODE_ACTIVE: &str = "Order mode active!";
pub const REPLY_ORDER_MODE_ALREADY_ACTIVE: &str = "Order mode is already active!";
pub const REPLY_CONFIRM_SEND: &str = "Are you sure you want to send the order?";
pub const REPLY_CONFIRM_CANCEL: &str = "Are you sure you want to cancel the order? [Y/N]";
pub const REPLY_ORDER_MODE_DISABLED: &str = "Order mode disabled";

/// The rule that fired for an event, in decision-list order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ActivateOrderMode,
    AlreadyActive,
    ConfirmSend,
    ConfirmCancel,
    CancelConfirmed,
}

impl Rule {
    pub fn reply(self) -> &'static str {
        match self {
            Rule::ActivateOrderMode => REPLY_ORDER_MODE_ACTIVE,
            Rule::AlreadyActive => REPLY_ORDER_MODE_ALREADY_ACTIVE,
            Rule::ConfirmSend => REPLY_CONFIRM_SEND,
            Rule::ConfirmCancel => REPLY_CONFIRM_CANCEL,
            Rule::CancelConfirmed => REPLY_ORDER_MODE_DISABLED,
        }
    }

    /// Rule name used in logs and metrics
    pub fn name(self) -> &'static str {
        match self {
            Rule::ActivateOrderMode => "activate_order_mode",
            Rule::AlreadyActive => "already_active",
            Rule::ConfirmSend => "confirm_send",
            Rule::ConfirmCancel => "confirm_cancel",
            Rule::CancelConfirmed => "cancel_confirmed",
        }
    }

    pub fn message(self) -> OutboundMessage {
        OutboundMessage::plain(self.reply())
    }
}

/// Apply the decision list to one admitted event and report which rule fired.
///
/// Whatever happens, `state.last_message_body` is set to the event body before
/// returning, so the next event sees this one as its predecessor.
pub fn evaluate(event: &InboundEvent, state: &mut SessionState) -> Option<Rule> {
    let rule = apply_rules(parse_command(&event.body), state);
    state.last_message_body = event.body.clone();
    rule
}

/// Interpret one admitted event against `state`, returning the reply if any
pub fn interpret(event: &InboundEvent, state: &mut SessionState) -> Option<OutboundMessage> {
    evaluate(event, state).map(Rule::message)
}

fn apply_rules(command: Command, state: &mut SessionState) -> Option<Rule> {
    match command {
        Command::Inder if !state.order_mode_active => {
            state.order_mode_active = true;
            Some(Rule::ActivateOrderMode)
        }
        Command::Inder => Some(Rule::AlreadyActive),
        Command::Order => Some(Rule::ConfirmSend),
        Command::Cancel if state.order_mode_active => Some(Rule::ConfirmCancel),
        Command::Confirm if state.awaiting_cancel_confirmation() => {
            // Confirming a cancel leaves order mode on. Kept as observed; see DESIGN.md.
            state.order_mode_active = true;
            Some(Rule::CancelConfirmed)
        }
        _ => None,
    }
}

/// Owns the session state so only the interpreter call path can touch it
#[derive(Debug, Default)]
pub struct CommandInterpreter {
    state: SessionState,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        Self { state }
    }

    pub fn evaluate(&mut self, event: &InboundEvent) -> Option<Rule> {
        evaluate(event, &mut self.state)
    }

    pub fn interpret(&mut self, event: &InboundEvent) -> Option<OutboundMessage> {
        interpret(event, &mut self.state)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}
