//! Helpers for running `execute` bindings through the shell.

use std::process::Command;

/// Placeholder replaced with the current item in `execute` templates
pub const PLACEHOLDER: &str = "{}";

/// Quotes `s` for `sh`
///
/// ```
/// use skim_term::util::quote_arg;
///
/// assert_eq!(quote_arg("a b"), "'a b'");
/// assert_eq!(quote_arg("it's"), r"'it'\''s'");
/// ```
pub fn quote_arg(s: &str) -> String {
    format!("'{}'", s.replace('\0', "\\0").replace('\'', "'\\''"))
}

/// Replaces every [`PLACEHOLDER`] in `template` with the quoted `current` text
pub fn expand_placeholder(template: &str, current: &str) -> String {
    template.replace(PLACEHOLDER, &quote_arg(current))
}

/// Runs user commands bound with `execute`
pub trait CommandRunner: Send {
    /// Runs `template` with the current item substituted, blocking until it exits
    fn run(&self, template: &str, current: &str);
}

/// Runs commands through `sh -c` with the terminal's standard streams
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, template: &str, current: &str) {
        let expanded_cmd = expand_placeholder(template, current);
        debug!("execute: {expanded_cmd}");
        let mut command = Command::new("sh");
        command.args(["-c", &expanded_cmd]);
        match command.spawn().and_then(|mut c| c.wait()) {
            Ok(status) if !status.success() => warn!("`{expanded_cmd}` exited with {status}"),
            Ok(_) => {}
            Err(e) => warn!("failed to run `{expanded_cmd}`: {e}"),
        }
    }
}
