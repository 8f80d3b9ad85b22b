//! Terminal rendering for results, summaries and errors.
//!
//! Colors are applied only when the [`Printer`] was created for a terminal.

use crate::batch::BatchOutcome;
use crate::types::{AccountInfo, EmailState, ValidationResult};
use crossterm::style::Stylize;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

#[derive(Debug, Clone, Copy)]
enum Tone {
    Good,
    Bad,
    Warn,
    Accent,
    Muted,
    Heading,
}

impl From<EmailState> for Tone {
    fn from(state: EmailState) -> Self {
        match state {
            EmailState::Valid => Tone::Good,
            EmailState::Invalid => Tone::Bad,
            EmailState::Risky => Tone::Warn,
            EmailState::Unknown => Tone::Muted,
        }
    }
}

fn state_icon(state: EmailState) -> &'static str {
    match state {
        EmailState::Valid => "\u{2713}",
        EmailState::Invalid => "\u{2717}",
        EmailState::Risky => "!",
        EmailState::Unknown => "?",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn for_stdout() -> Self {
        Self::new(io::stdout().is_terminal())
    }

    pub fn for_stderr() -> Self {
        Self::new(io::stderr().is_terminal())
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Good => text.green().bold().to_string(),
            Tone::Bad => text.red().bold().to_string(),
            Tone::Warn => text.yellow().bold().to_string(),
            Tone::Accent => text.cyan().to_string(),
            Tone::Muted => text.dim().to_string(),
            Tone::Heading => text.bold().to_string(),
        }
    }

    fn field<W: Write>(&self, w: &mut W, label: &str, value: &str) -> io::Result<()> {
        let label = format!("{:<12}", label);
        writeln!(w, "  {}{}", self.paint(&label, Tone::Muted), value)
    }

    /// Multi-line human-readable verdict.
    pub fn validation_result<W: Write>(&self, w: &mut W, r: &ValidationResult) -> io::Result<()> {
        let state = r.category();
        let headline = format!("{} {}", state_icon(state), r.email);
        writeln!(w, "{}", self.paint(&headline, state.into()))?;

        self.field(w, "State:", &self.paint(&r.state, state.into()))?;
        self.field(w, "Sub-state:", &r.sub_state)?;
        self.field(w, "Free email:", yes_no(r.free_email))?;
        if r.role {
            self.field(w, "Role:", "yes")?;
        }
        if r.disposable {
            self.field(w, "Disposable:", "yes")?;
        }
        if let Some(suggestion) = &r.suggestion {
            self.field(w, "Suggestion:", &self.paint(suggestion, Tone::Accent))?;
        }
        Ok(())
    }

    /// Just the state, one per line.
    pub fn validation_quiet<W: Write>(&self, w: &mut W, r: &ValidationResult) -> io::Result<()> {
        writeln!(w, "{}", r.state)
    }

    /// Pretty-printed JSON followed by a newline.
    pub fn json<W: Write, T: Serialize + ?Sized>(&self, w: &mut W, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *w, value)?;
        writeln!(w)
    }

    pub fn summary<W: Write>(&self, w: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
        writeln!(w)?;
        writeln!(w, "{}", self.paint("Summary", Tone::Heading))?;
        writeln!(w, "  Total:   {}", outcome.total())?;
        writeln!(w, "{}", self.paint(&format!("  Valid:   {}", outcome.valid), Tone::Good))?;
        writeln!(w, "{}", self.paint(&format!("  Invalid: {}", outcome.invalid), Tone::Bad))?;
        writeln!(w, "{}", self.paint(&format!("  Risky:   {}", outcome.risky), Tone::Warn))?;
        writeln!(w, "{}", self.paint(&format!("  Unknown: {}", outcome.unknown), Tone::Muted))?;
        if outcome.failed > 0 {
            writeln!(w, "{}", self.paint(&format!("  Failed:  {}", outcome.failed), Tone::Bad))?;
        }
        Ok(())
    }

    pub fn account_info<W: Write>(&self, w: &mut W, info: &AccountInfo) -> io::Result<()> {
        writeln!(w, "{}", self.paint("Account Info", Tone::Heading))?;
        self.field(w, "Email:", &info.email)?;
        self.field(w, "Plan:", &info.plan)?;
        self.field(w, "Credits:", &info.credits.to_string())
    }

    pub fn error<W: Write>(&self, w: &mut W, msg: impl Display) -> io::Result<()> {
        writeln!(w, "{}", self.paint(&format!("Error: {}", msg), Tone::Bad))
    }

    pub fn warning<W: Write>(&self, w: &mut W, msg: impl Display) -> io::Result<()> {
        writeln!(w, "{}", self.paint(&format!("Warning: {}", msg), Tone::Warn))
    }
}
