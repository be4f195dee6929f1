// ABOUTME: Counter helpers for bot activity using the metrics facade
// ABOUTME: No-ops unless the embedding binary installs a recorder

use metrics::counter;

/// Record the gate outcome for one inbound event
pub fn record_event(outcome: &'static str) {
    counter!("inder_events_total", "outcome" => outcome).increment(1);
}

/// Record an interpreter rule that fired
pub fn record_rule(rule: &'static str) {
    counter!("inder_rules_total", "rule" => rule).increment(1);
}

pub fn record_message_sent() {
    counter!("inder_messages_sent_total").increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!("inder_errors_total", "kind" => kind).increment(1);
}
