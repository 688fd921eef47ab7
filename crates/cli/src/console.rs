//! Terminal surface: notifications on stdout/stderr and yes/no prompts on stdin.

use deskhub_core::{Confirm, Notification, Notifier, Severity};
use std::io::{self, BufRead, Write};

/// Successes and infos go to stdout, warnings and errors to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        match n.severity {
            Severity::Success | Severity::Info => println!("{}", n.message),
            Severity::Warning | Severity::Error => {
                eprintln!("{}: {}", n.severity.as_str(), n.message)
            }
        }
    }
}

/// Delete confirmation. `--yes` answers every prompt up front.
pub struct Prompt {
    pub assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match read_line(&format!("{prompt} [y/N] ")) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation");
                false
            }
        }
    }
}

/// Print `prompt` without a newline and read one line from stdin.
pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
