//! Result of a finished session.

use std::io::{self, Write};

/// What the session ended with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermOutput {
    /// Query at the end of the session
    pub query: String,
    /// Name of the accepting key, empty for the default accept key.
    ///
    /// `None` when no expect keys are configured, in which case no key line is printed.
    pub accept_key: Option<String>,
    /// Selected lines in selection order, or the current line when nothing was selected
    pub selected: Vec<String>,
    /// The session was aborted
    pub is_abort: bool,
}

impl TermOutput {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        if self.is_abort { 1 } else { 0 }
    }

    /// Prints the output; an aborted session prints nothing
    pub fn write_to(&self, w: &mut impl Write, print_query: bool) -> io::Result<()> {
        if self.is_abort {
            return Ok(());
        }
        if print_query {
            writeln!(w, "{}", self.query)?;
        }
        if let Some(key) = &self.accept_key {
            writeln!(w, "{key}")?;
        }
        for line in &self.selected {
            writeln!(w, "{line}")?;
        }
        w.flush()
    }
}
