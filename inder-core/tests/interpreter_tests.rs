// ABOUTME: Tests for the order command interpreter state machine
// ABOUTME: Exercises every transition, the cancel confirmation window, and last-body tracking

use inder_core::interpreter::{
    evaluate, interpret, CommandInterpreter, Rule, REPLY_CONFIRM_CANCEL, REPLY_CONFIRM_SEND,
    REPLY_ORDER_MODE_ACTIVE, REPLY_ORDER_MODE_ALREADY_ACTIVE, REPLY_ORDER_MODE_DISABLED,
};
use inder_core::session::{Phase, SessionState};
use inder_core::traits::{ChatUser, InboundEvent};

fn msg(body: &str) -> InboundEvent {
    InboundEvent {
        room_id: "!orders:test.com".to_string(),
        sender: ChatUser::with_name("@alice:test.com", "Alice"),
        body: body.to_string(),
        event_id: format!("${}", body),
        server_timestamp_millis: 0,
        received_at_millis: 0,
    }
}

/// Feed bodies in order, collecting reply texts (None for silence)
fn run(interp: &mut CommandInterpreter, bodies: &[&str]) -> Vec<Option<String>> {
    bodies
        .iter()
        .map(|b| interp.interpret(&msg(b)).map(|m| m.body))
        .collect()
}

fn active_state() -> SessionState {
    SessionState {
        order_mode_active: true,
        last_message_body: String::new(),
    }
}

#[test]
fn test_inder_from_idle_activates_order_mode() {
    let mut state = SessionState::new();
    let reply = interpret(&msg(".inder"), &mut state);
    assert_eq!(reply.unwrap().body, REPLY_ORDER_MODE_ACTIVE);
    assert!(state.order_mode_active);
    assert_eq!(state.last_message_body, ".inder");
}

#[test]
fn test_inder_when_active_reports_already_active() {
    let mut state = active_state();
    let reply = interpret(&msg(".inder"), &mut state);
    assert_eq!(reply.unwrap().body, REPLY_ORDER_MODE_ALREADY_ACTIVE);
    assert!(state.order_mode_active);
}

#[test]
fn test_order_asks_for_confirmation_in_either_state() {
    for initial in [SessionState::new(), active_state()] {
        let mut state = initial.clone();
        let reply = interpret(&msg(".order"), &mut state);
        assert_eq!(reply.unwrap().body, REPLY_CONFIRM_SEND);
        assert_eq!(state.order_mode_active, initial.order_mode_active);
    }
}

#[test]
fn test_cancel_when_active_prompts_and_primes_confirmation() {
    let mut state = active_state();
    let reply = interpret(&msg(".cancel"), &mut state);
    assert_eq!(reply.unwrap().body, REPLY_CONFIRM_CANCEL);
    assert!(state.order_mode_active);
    assert_eq!(state.phase(), Phase::AwaitingCancelConfirmation);
}

#[test]
fn test_cancel_when_idle_is_silent_but_still_primes() {
    let mut state = SessionState::new();
    assert!(interpret(&msg(".cancel"), &mut state).is_none());
    assert_eq!(state.last_message_body, ".cancel");

    // The confirm rule only looks at the previous body
    let reply = interpret(&msg("y"), &mut state);
    assert_eq!(reply.unwrap().body, REPLY_ORDER_MODE_DISABLED);
    assert!(state.order_mode_active);
}

#[test]
fn test_confirm_accepts_either_case() {
    for answer in ["Y", "y"] {
        let mut state = active_state();
        interpret(&msg(".cancel"), &mut state);
        let reply = interpret(&msg(answer), &mut state);
        assert_eq!(reply.unwrap().body, REPLY_ORDER_MODE_DISABLED);
    }
}

#[test]
fn test_confirm_leaves_order_mode_active() {
    let mut state = active_state();
    interpret(&msg(".cancel"), &mut state);
    interpret(&msg("Y"), &mut state);
    assert!(state.order_mode_active);
    assert_eq!(state.phase(), Phase::OrderModeActive);
}

#[test]
fn test_yes_is_not_a_confirmation() {
    let mut state = active_state();
    interpret(&msg(".cancel"), &mut state);
    assert!(interpret(&msg("YES"), &mut state).is_none());
    assert_eq!(state.last_message_body, "YES");
}

#[test]
fn test_y_without_preceding_cancel_is_silent() {
    let mut state = active_state();
    assert!(interpret(&msg("Y"), &mut state).is_none());
}

#[test]
fn test_intervening_message_closes_confirmation_window() {
    let mut interp = CommandInterpreter::with_state(active_state());
    let replies = run(&mut interp, &[".cancel", "hmm", "Y"]);
    assert_eq!(
        replies,
        vec![Some(REPLY_CONFIRM_CANCEL.to_string()), None, None]
    );
}

#[test]
fn test_unrecognized_text_only_updates_last_body() {
    let mut interp = CommandInterpreter::new();
    for body in ["hello", "order", "!inder", "lunch?"] {
        assert!(interp.interpret(&msg(body)).is_none());
        assert!(!interp.state().order_mode_active);
        assert_eq!(interp.state().last_message_body, body);
    }
}

#[test]
fn test_inder_cancel_confirm_scenario() {
    let mut interp = CommandInterpreter::new();
    let replies = run(&mut interp, &[".inder", ".cancel", "Y"]);
    assert_eq!(
        replies,
        vec![
            Some(REPLY_ORDER_MODE_ACTIVE.to_string()),
            Some(REPLY_CONFIRM_CANCEL.to_string()),
            Some(REPLY_ORDER_MODE_DISABLED.to_string()),
        ]
    );
    assert!(interp.state().order_mode_active);
    assert_eq!(interp.state().last_message_body, "Y");
}

#[test]
fn test_second_y_after_confirmation_is_silent() {
    let mut interp = CommandInterpreter::new();
    let replies = run(&mut interp, &[".inder", ".cancel", "Y", "Y"]);
    assert_eq!(replies[3], None);
}

#[test]
fn test_evaluate_reports_the_rule_that_fired() {
    let mut interp = CommandInterpreter::new();
    let rules: Vec<Option<Rule>> = [".inder", ".inder", ".order", ".cancel", "Y", "hello"]
        .iter()
        .map(|b| interp.evaluate(&msg(b)))
        .collect();
    assert_eq!(
        rules,
        vec![
            Some(Rule::ActivateOrderMode),
            Some(Rule::AlreadyActive),
            Some(Rule::ConfirmSend),
            Some(Rule::ConfirmCancel),
            Some(Rule::CancelConfirmed),
            None,
        ]
    );
}

#[test]
fn test_commands_that_fire_no_rule_report_none() {
    // `.cancel` while idle and a stray `Y` parse as commands but match no rule
    let mut state = SessionState::new();
    assert_eq!(evaluate(&msg(".cancel"), &mut state), None);
    assert_eq!(evaluate(&msg("hello"), &mut state), None);
    assert_eq!(evaluate(&msg("Y"), &mut state), None);
    assert_eq!(state.last_message_body, "Y");
}

#[test]
fn test_rule_replies_match_reply_texts() {
    assert_eq!(Rule::ActivateOrderMode.reply(), REPLY_ORDER_MODE_ACTIVE);
    assert_eq!(Rule::CancelConfirmed.message().body, REPLY_ORDER_MODE_DISABLED);
    assert_eq!(Rule::ConfirmCancel.name(), "confirm_cancel");
}
