//! Key binding configuration and parsing.
//!
//! Keys are named the way `--bind` and `--expect` spell them (`ctrl-a`, `alt-b`,
//! `f1`, `enter`, a single character...), and accept keys are printed back with
//! the same names.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::options::TermOptions;
use crate::tui::event::{self, Action};

/// Errors in key binding configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The key name is not recognized
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    /// The action name is not recognized
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The binding is not of the form `key:action`
    #[error("invalid binding `{0}`, expected key:action")]
    Malformed(String),
    /// `execute` without a command
    #[error("missing command for `execute` in `{0}`")]
    MissingCommand(String),
}

/// A map of key events to their associated actions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMap(pub HashMap<KeyEvent, Action>);

impl Deref for KeyMap {
    type Target = HashMap<KeyEvent, Action>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for KeyMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap(get_default_key_map())
    }
}

/// Command templates run by [`Action::Execute`], by triggering key
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecMap(pub HashMap<KeyEvent, String>);

impl Deref for ExecMap {
    type Target = HashMap<KeyEvent, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for ExecMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}
fn alt(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::ALT)
}
fn shift(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

/// Get the default key map
#[rustfmt::skip]
pub fn get_default_key_map() -> HashMap<KeyEvent, Action> {
    use Action::*;
    let mut ret = HashMap::new();
    ret.insert(ctrl('a'), BeginningOfLine);
    ret.insert(ctrl('b'), BackwardChar);
    ret.insert(ctrl('c'), Abort);
    ret.insert(ctrl('d'), DeleteChar);
    ret.insert(ctrl('e'), EndOfLine);
    ret.insert(ctrl('f'), ForwardChar);
    ret.insert(ctrl('g'), Abort);
    ret.insert(ctrl('h'), BackwardDeleteChar);
    ret.insert(ctrl('j'), Down);
    ret.insert(ctrl('k'), Up);
    ret.insert(ctrl('l'), ClearScreen);
    ret.insert(ctrl('m'), Accept);
    ret.insert(ctrl('n'), Down);
    ret.insert(ctrl('p'), Up);
    ret.insert(ctrl('q'), Abort);
    ret.insert(ctrl('u'), UnixLineDiscard);
    ret.insert(ctrl('w'), UnixWordRubout);
    ret.insert(ctrl('y'), Yank);

    ret.insert(key(KeyCode::Esc),       Abort);
    ret.insert(key(KeyCode::Enter),     Accept);
    ret.insert(key(KeyCode::Backspace), BackwardDeleteChar);
    ret.insert(key(KeyCode::Delete),    DeleteChar);
    ret.insert(key(KeyCode::Tab),       ToggleDown);
    ret.insert(key(KeyCode::BackTab),   ToggleUp);
    ret.insert(key(KeyCode::Up),        Up);
    ret.insert(key(KeyCode::Down),      Down);
    ret.insert(key(KeyCode::Left),      BackwardChar);
    ret.insert(key(KeyCode::Right),     ForwardChar);
    ret.insert(key(KeyCode::Home),      BeginningOfLine);
    ret.insert(key(KeyCode::End),       EndOfLine);
    ret.insert(key(KeyCode::PageUp),    PageUp);
    ret.insert(key(KeyCode::PageDown),  PageDown);

    ret.insert(alt(KeyCode::Char('b')),   BackwardWord);
    ret.insert(alt(KeyCode::Char('f')),   ForwardWord);
    ret.insert(alt(KeyCode::Char('d')),   KillWord);
    ret.insert(alt(KeyCode::Backspace),   BackwardKillWord);
    ret.insert(shift(KeyCode::Left),      BackwardWord);
    ret.insert(shift(KeyCode::Right),     ForwardWord);
    ret
}

/// Brings a key event read from the terminal to the form keymaps are keyed by.
///
/// Only ctrl, alt and shift are kept, and shift only where it is not already
/// reflected in the key itself (characters, back-tab).
pub fn normalize_key(key: KeyEvent) -> KeyEvent {
    let mut mods = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
    if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
        mods.remove(KeyModifiers::SHIFT);
    }
    KeyEvent::new(key.code, mods)
}

/// Parse a single key name into a key event
pub fn parse_key(raw: &str) -> Result<KeyEvent, BindError> {
    let unknown = || BindError::UnknownKey(raw.to_string());
    let mut chars = raw.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(key(KeyCode::Char(c)));
    }

    let (mods, name) = match raw.split_once('-') {
        Some(("ctrl", name)) => (KeyModifiers::CONTROL, name),
        Some(("alt", name)) => (KeyModifiers::ALT, name),
        Some(("shift", name)) => (KeyModifiers::SHIFT, name),
        _ => (KeyModifiers::NONE, raw),
    };
    let code = match name {
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "btab" => KeyCode::BackTab,
        "bspace" | "bs" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "page-up" => KeyCode::PageUp,
        "pgdn" | "pgdown" | "page-down" => KeyCode::PageDown,
        s if s.len() > 1 && s.starts_with('f') => {
            let n = s[1..].parse::<u8>().map_err(|_| unknown())?;
            if !(1..=12).contains(&n) {
                return Err(unknown());
            }
            KeyCode::F(n)
        }
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if mods != KeyModifiers::NONE => KeyCode::Char(c.to_ascii_lowercase()),
                _ => return Err(unknown()),
            }
        }
    };
    if mods == KeyModifiers::SHIFT && !matches!(code, KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down) {
        return Err(unknown());
    }
    Ok(KeyEvent::new(code, mods))
}

/// Name of `key` as printed for accept keys; the inverse of [`parse_key`]
pub fn key_name(key: &KeyEvent) -> String {
    let mut name = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        name.push_str("ctrl-");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        name.push_str("alt-");
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        name.push_str("shift-");
    }
    match key.code {
        KeyCode::Char(' ') => name.push_str("space"),
        KeyCode::Char(c) => name.push(c),
        KeyCode::F(n) => name.push_str(&format!("f{n}")),
        KeyCode::Enter => name.push_str("enter"),
        KeyCode::Esc => name.push_str("esc"),
        KeyCode::Tab => name.push_str("tab"),
        KeyCode::BackTab => name.push_str("btab"),
        KeyCode::Backspace => name.push_str("bspace"),
        KeyCode::Delete => name.push_str("del"),
        KeyCode::Up => name.push_str("up"),
        KeyCode::Down => name.push_str("down"),
        KeyCode::Left => name.push_str("left"),
        KeyCode::Right => name.push_str("right"),
        KeyCode::Home => name.push_str("home"),
        KeyCode::End => name.push_str("end"),
        KeyCode::PageUp => name.push_str("pgup"),
        KeyCode::PageDown => name.push_str("pgdn"),
        other => name.push_str(&format!("{other:?}").to_lowercase()),
    }
    name
}

/// Parse a single `key:action` binding, returning the command for `execute` bindings
pub fn parse_binding(binding: &str) -> Result<(KeyEvent, Action, Option<String>), BindError> {
    // `:` itself can be bound, as in `:::accept`... but the first `:` always separates
    let (raw_key, raw_action) = match binding.strip_prefix("::") {
        Some(rest) => (":", rest),
        None => binding
            .split_once(':')
            .ok_or_else(|| BindError::Malformed(binding.to_string()))?,
    };
    let key = parse_key(raw_key)?;

    if let Some(rest) = raw_action.strip_prefix("execute") {
        let command = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .or_else(|| rest.strip_prefix(':'))
            .filter(|cmd| !cmd.is_empty())
            .ok_or_else(|| BindError::MissingCommand(binding.to_string()))?;
        return Ok((key, Action::Execute, Some(command.to_string())));
    }

    let action = event::parse_action(raw_action).ok_or_else(|| BindError::UnknownAction(raw_action.to_string()))?;
    Ok((key, action, None))
}

/// Splits a comma-separated binding list.
///
/// Commas inside `execute(...)` belong to the command, and `execute:` swallows the
/// rest of the list.
pub fn split_bindings(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let bytes = list.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'(' if list[..idx].ends_with("execute") || depth > 0 => depth += 1,
            b')' if depth > 0 => depth -= 1,
            b':' if depth == 0 && list[idx + 1..].starts_with("execute:") => {
                parts.push(&list[start..]);
                return parts;
            }
            b',' if depth == 0 && idx > start => {
                parts.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    if start < list.len() {
        parts.push(&list[start..]);
    }
    parts
}

/// Everything key-related the dispatcher needs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    /// Key to action
    pub keymap: KeyMap,
    /// Key to command, for keys bound to `execute`
    pub execmap: ExecMap,
    /// Keys that accept and get reported in the output
    pub expect: Vec<KeyEvent>,
}

impl Bindings {
    /// Builds the bindings from the defaults and the options, later bindings winning
    pub fn from_options(options: &TermOptions) -> Result<Self, BindError> {
        let mut bindings = Bindings::default();
        if options.history.is_some() {
            bindings.keymap.insert(ctrl('p'), Action::PreviousHistory);
            bindings.keymap.insert(ctrl('n'), Action::NextHistory);
        }
        if let Some(raw) = &options.toggle_sort {
            bindings.keymap.insert(parse_key(raw)?, Action::ToggleSort);
        }
        for list in &options.bind {
            for binding in split_bindings(list) {
                bindings.add(binding)?;
            }
        }
        for list in &options.expect {
            for raw in list.split(',').filter(|k| !k.is_empty()) {
                bindings.expect.push(parse_key(raw)?);
            }
        }
        Ok(bindings)
    }

    /// Adds a single `key:action` binding
    pub fn add(&mut self, binding: &str) -> Result<(), BindError> {
        let (key, action, command) = parse_binding(binding)?;
        debug!("binding {} to {action:?}", key_name(&key));
        match command {
            Some(command) => {
                self.execmap.insert(key, command);
            }
            None => {
                self.execmap.remove(&key);
            }
        }
        self.keymap.insert(key, action);
        Ok(())
    }
}
