//! User interaction operations (confirmation prompts).

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::RealRuntime;

/// Asks `prompt` on `output` and reads one answer line from `input`.
/// End of input counts as a refusal.
pub(crate) fn ask<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation answer")?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        ask(prompt, &mut stdin.lock(), &mut stdout)
    }
}
