//! Interactive confirmation prompt for the security gate.
//!
//! Implements the application layer's [`ConfirmationPort`] against the
//! process terminal. Two states are decided once per request:
//!
//! - **tty-available**: standard input is an interactive terminal — prompt
//!   on stdout and read one line from stdin.
//! - **tty-unavailable**: stdin is piped or redirected — open the platform
//!   console device (`/dev/tty` on POSIX, `CON` on Windows) in read-write
//!   mode. If that open fails there is no one to ask, and the confirmation
//!   fails as unavailable.
//!
//! Exactly one line is read per attempt and the device stream is released
//! on every exit path (the handle drops at the end of the call).

use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use prism_application::ports::confirmation::{ConfirmationError, ConfirmationPort};

#[cfg(unix)]
const CONSOLE_DEVICE: &str = "/dev/tty";
#[cfg(windows)]
const CONSOLE_DEVICE: &str = "CON";

/// Terminal-backed confirmation prompt.
pub struct TtyConfirmation;

impl TtyConfirmation {
    pub fn new() -> Self {
        Self
    }

    fn ask_via_stdin(&self, prompt: &str, default: bool) -> Result<bool, ConfirmationError> {
        print!("{} {} ", prompt, answer_hint(default));
        io::stdout()
            .flush()
            .map_err(|e| ConfirmationError::Unavailable(e.to_string()))?;

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| ConfirmationError::Unavailable(e.to_string()))?;

        parse_answer(if read == 0 { None } else { Some(&line) }, default)
    }

    fn ask_via_device(&self, prompt: &str, default: bool) -> Result<bool, ConfirmationError> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(CONSOLE_DEVICE)
            .map_err(|e| {
                ConfirmationError::Unavailable(format!("{}: {}", CONSOLE_DEVICE, e))
            })?;

        // One write, one read; the handle closes when this scope ends,
        // whatever path we leave by.
        let mut writer = &device;
        write!(writer, "{} {} ", prompt, answer_hint(default))
            .and_then(|_| writer.flush())
            .map_err(|e| ConfirmationError::Unavailable(e.to_string()))?;

        let mut line = String::new();
        let read = BufReader::new(&device)
            .read_line(&mut line)
            .map_err(|e| ConfirmationError::Unavailable(e.to_string()))?;

        parse_answer(if read == 0 { None } else { Some(&line) }, default)
    }
}

impl Default for TtyConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationPort for TtyConfirmation {
    async fn confirm(&self, prompt: &str, default: bool) -> Result<bool, ConfirmationError> {
        if io::stdin().is_terminal() {
            self.ask_via_stdin(prompt, default)
        } else {
            self.ask_via_device(prompt, default)
        }
    }
}

fn answer_hint(default: bool) -> &'static str {
    if default { "[Y/n]" } else { "[y/N]" }
}

/// Interpret one answer line. `None` means end-of-stream.
fn parse_answer(line: Option<&str>, default: bool) -> Result<bool, ConfirmationError> {
    let Some(line) = line else {
        return Ok(default);
    };
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(ConfirmationError::InvalidAnswer {
            answer: other.to_string(),
        }),
    }
}
