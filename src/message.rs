// src/message.rs

//! Default display message built from the command tokens.

/// Size of the message buffer, including one byte reserved for a terminator.
pub const MAX_MESSAGE_LEN: usize = 512;

const PREFIX: &str = "Running:";

/// Build `"Running: tok1 tok2 ..."`.
///
/// The result never exceeds `MAX_MESSAGE_LEN - 1` bytes. Once a token does not
/// fit, it and every following token are dropped silently.
pub fn default_message<S: AsRef<str>>(command: &[S]) -> String {
    let limit = MAX_MESSAGE_LEN - 1;
    let mut message = String::from(PREFIX);

    for token in command {
        let token = token.as_ref();
        if message.len() + 1 + token.len() > limit {
            break;
        }
        message.push(' ');
        message.push_str(token);
    }

    message
}
