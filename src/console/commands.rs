/// Operator commands accepted at the server terminal.
#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    Help,
    Broadcast,
    ClearScreen,
    List,
    Kick,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse a raw operator line into a `ConsoleCommand`. Matching is
/// case-insensitive; a blank line is `Empty` and anything unrecognized is
/// reported back verbatim.
pub fn parse_command(raw: &str) -> ConsoleCommand {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ConsoleCommand::Empty;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "help" => ConsoleCommand::Help,
        "bc" => ConsoleCommand::Broadcast,
        "cls" => ConsoleCommand::ClearScreen,
        "ls" => ConsoleCommand::List,
        "kick" => ConsoleCommand::Kick,
        "quit" => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(trimmed.to_string()),
    }
}
