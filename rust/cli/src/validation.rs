//! Parsing of interactive input and numeric arguments.
//!
//! Input is case-insensitive and trimmed. `q`/`quit` is accepted at every
//! prompt.

use blindjack_engine::player::{Action, Eyes};
use blindjack_engine::table::PlayerReply;

/// Outcome of parsing one line typed at a prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult<T> {
    Parsed(T),
    /// `q` or `quit`
    Quit,
    /// Unusable input, with a message to show before asking again
    Invalid(String),
}

fn is_quit(word: &str) -> bool {
    word == "q" || word == "quit"
}

/// Eyes for the coming turn: `o`/`open` or `c`/`closed`.
///
/// ```rust
/// # use blindjack_cli::validation::{parse_eyes, ParseResult};
/// use blindjack_engine::player::Eyes;
///
/// assert_eq!(parse_eyes("O"), ParseResult::Parsed(Eyes::Open));
/// assert_eq!(parse_eyes("closed"), ParseResult::Parsed(Eyes::Closed));
/// assert_eq!(parse_eyes("q"), ParseResult::Quit);
/// ```
pub fn parse_eyes(input: &str) -> ParseResult<Eyes> {
    let word = input.trim().to_lowercase();
    match word.as_str() {
        "" => ParseResult::Invalid("Empty input".to_string()),
        "o" | "open" => ParseResult::Parsed(Eyes::Open),
        "c" | "close" | "closed" => ParseResult::Parsed(Eyes::Closed),
        w if is_quit(w) => ParseResult::Quit,
        other => ParseResult::Invalid(format!(
            "Unrecognized eyes '{}'. Valid choices: o (open), c (closed), q",
            other
        )),
    }
}

/// Turn command: `h`/`hit`, `s`/`stand`, `p`/`peek`/`preview`.
///
/// Quitting comes back as [`ParseResult::Quit`], not as
/// [`PlayerReply::Quit`], so callers decide how to end the turn.
///
/// ```rust
/// # use blindjack_cli::validation::{parse_turn_reply, ParseResult};
/// use blindjack_engine::player::Action;
/// use blindjack_engine::table::PlayerReply;
///
/// assert_eq!(parse_turn_reply("h"), ParseResult::Parsed(PlayerReply::Act(Action::Hit)));
/// assert_eq!(parse_turn_reply("peek"), ParseResult::Parsed(PlayerReply::Preview));
/// match parse_turn_reply("double") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("expected Invalid"),
/// }
/// ```
pub fn parse_turn_reply(input: &str) -> ParseResult<PlayerReply> {
    let word = input.trim().to_lowercase();
    match word.as_str() {
        "" => ParseResult::Invalid("Empty input".to_string()),
        "h" | "hit" => ParseResult::Parsed(PlayerReply::Act(Action::Hit)),
        "s" | "stand" => ParseResult::Parsed(PlayerReply::Act(Action::Stand)),
        "p" | "peek" | "preview" => ParseResult::Parsed(PlayerReply::Preview),
        w if is_quit(w) => ParseResult::Quit,
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: h (hit), s (stand), p (preview), q",
            other
        )),
    }
}

/// Rejects zero counts such as `--rounds 0` or `--matches 0`.
pub fn validate_positive(name: &str, value: u64) -> Result<(), String> {
    if value == 0 {
        return Err(format!("{} must be >= 1", name));
    }
    Ok(())
}
