// ABOUTME: Literal command recognition for order bot messages
// ABOUTME: Maps an exact message body to one of the fixed dot-commands or a confirmation

/// A recognized message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `.inder` - enter order mode
    Inder,
    /// `.order` - ask to send the order
    Order,
    /// `.cancel` - ask to cancel the order
    Cancel,
    /// `Y` in either case - answers a pending confirmation
    Confirm,
    /// Anything else
    Unrecognized,
}

impl Command {
    pub const INDER: &'static str = ".inder";
    pub const ORDER: &'static str = ".order";
    pub const CANCEL: &'static str = ".cancel";
}

/// Parse a message body. Matching is exact: no trimming, no prefixes, no arguments.
pub fn parse_command(body: &str) -> Command {
    match body {
        Command::INDER => Command::Inder,
        Command::ORDER => Command::Order,
        Command::CANCEL => Command::Cancel,
        b if b.eq_ignore_ascii_case("y") => Command::Confirm,
        _ => Command::Unrecognized,
    }
}
