// discfinalize/src/prompt.rs
//! Yes/no confirmation for the operator.

use std::io::{self, BufRead, Write};

/// Shows `message` and reads one line. Only a reply whose first character is a
/// lowercase `y` accepts; anything else, including end of input, declines.
pub(crate) fn confirm_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<bool> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut reply = String::new();
    input.read_line(&mut reply)?;
    Ok(reply.starts_with('y'))
}

/// Asks on the terminal. A failure to read the reply counts as "no".
pub(crate) fn confirm(message: &str) -> bool {
    let stdin = io::stdin();
    match confirm_from(&mut stdin.lock(), &mut io::stdout(), message) {
        Ok(answer) => answer,
        Err(e) => {
            log::warn!("could not read confirmation: {}", e);
            false
        }
    }
}
