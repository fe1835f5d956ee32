//! Interactive prompts for credential management

use std::io::{self, BufRead, ErrorKind, IsTerminal, Write};

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// Answer `confirm` requires, typed exactly
pub const CONFIRMATION: &str = "yes";

/// The two questions `superglance-keyring` asks
pub trait Prompt {
    /// Hidden entry; `None` when the user aborted
    fn secret(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;

    /// Typed `yes` confirmation
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn secret(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        read_secret(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        confirm(prompt)
    }
}

/// Read a secret without echoing it.
///
/// Line editing and control keys are left to the terminal driver. Returns
/// `None` on Ctrl-D; Ctrl-C interrupts the process. When stdin is not a
/// terminal a single line is read from it instead.
pub fn read_secret(prompt: &str) -> anyhow::Result<Option<String>> {
    if io::stdin().is_terminal() {
        return secret_or_abort(rpassword::prompt_password(prompt));
    }

    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;
    read_secret_from(&mut io::stdin().lock())
}

/// Read one secret line from `reader`, trailing newline removed
pub fn read_secret_from(reader: &mut impl BufRead) -> anyhow::Result<Option<String>> {
    secret_or_abort(rpassword::read_password_from_bufread(reader))
}

fn secret_or_abort(result: io::Result<String>) -> anyhow::Result<Option<String>> {
    match result {
        Ok(secret) => Ok(Some(secret)),
        Err(e) if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted) => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask the user to type `yes`; anything else, or an aborted prompt, is a no
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let config = Config::builder().auto_add_history(false).build();
    let mut editor: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    match editor.readline(prompt) {
        Ok(line) => Ok(line == CONFIRMATION),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
