use std::io::{BufRead, Write};

use hyperlab_core::error::Result;

/// Represents the operator's answer when confirming a state-changing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunChoice {
    Yes,
    No,
}

/// Confirms with the operator whether the described command should run.
///
/// An empty answer or `y` confirms, `n` declines, anything else asks again.
/// Running out of input declines.
pub fn confirm_should_run<R: BufRead, W: Write>(
    description: &str,
    input: &mut R,
    output: &mut W,
) -> Result<RunChoice> {
    loop {
        write!(output, "{description}. Are you sure? ([Y]es/[n]o): ")?;
        output.flush()?;

        // Read operator input
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(RunChoice::No);
        }

        let lowercase_answer = answer.trim().to_lowercase();

        if lowercase_answer.as_str() == "y" || lowercase_answer.is_empty() {
            return Ok(RunChoice::Yes);
        }

        if lowercase_answer.as_str() == "n" {
            return Ok(RunChoice::No);
        }
    }
}
