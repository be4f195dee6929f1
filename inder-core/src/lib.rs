// ABOUTME: Platform-agnostic core of the inder order bot
// ABOUTME: Event gate, command interpreter, session state, and the run loop over a RoomChannel

pub mod bot;
pub mod commands;
pub mod config;
pub mod gate;
pub mod interpreter;
pub mod metrics;
pub mod paths;
pub mod session;
pub mod traits;

pub use bot::{HandleResult, OrderBot, GREETING};
pub use gate::{admit, Admission, EventGate, STALENESS_WINDOW_MILLIS};
pub use interpreter::{interpret, CommandInterpreter};
pub use session::{Phase, SessionState};
pub use traits::{ChatUser, EventStream, InboundEvent, OutboundMessage, RoomChannel};
