use crossterm::event::KeyEvent;

/// A raw event read from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// A mouse gesture
    Mouse(MouseInput),
}

/// What the mouse did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseGesture {
    /// Wheel motion, positive when scrolling up
    Wheel(i32),
    /// Left button press
    Click,
    /// Second left button press on the same cell
    DoubleClick,
}

/// A mouse event, in screen coordinates from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    /// Screen row
    pub row: usize,
    /// Screen column
    pub col: usize,
    /// Gesture
    pub gesture: MouseGesture,
    /// Whether ctrl, alt or shift was held
    pub modifier: bool,
}

/// Semantic actions keys can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Action {
    Abort,
    Accept,
    AddChar(char),
    BackwardChar,
    BackwardDeleteChar,
    BackwardKillWord,
    BackwardWord,
    BeginningOfLine,
    ClearScreen,
    DeleteChar,
    DeselectAll,
    Down,
    EndOfLine,
    /// Run the command bound to the same key, see [`crate::binds::ExecMap`]
    Execute,
    ForwardChar,
    ForwardWord,
    Ignore,
    KillLine,
    KillWord,
    Mouse(MouseInput),
    NextHistory,
    PageDown,
    PageUp,
    PreviousHistory,
    SelectAll,
    Toggle,
    ToggleAll,
    ToggleDown,
    ToggleSort,
    ToggleUp,
    UnixLineDiscard,
    UnixWordRubout,
    Up,
    Yank,
}

/// Parses an action name as used in `--bind`.
///
/// `execute` takes its command separately, see [`crate::binds::parse_binding`].
pub fn parse_action(raw_action: &str) -> Option<Action> {
    use Action::*;
    let action = match raw_action {
        "abort" => Abort,
        "accept" => Accept,
        "backward-char" => BackwardChar,
        "backward-delete-char" => BackwardDeleteChar,
        "backward-kill-word" => BackwardKillWord,
        "backward-word" => BackwardWord,
        "beginning-of-line" => BeginningOfLine,
        "clear-screen" => ClearScreen,
        "delete-char" => DeleteChar,
        "deselect-all" => DeselectAll,
        "down" => Down,
        "end-of-line" => EndOfLine,
        "execute" => Execute,
        "forward-char" => ForwardChar,
        "forward-word" => ForwardWord,
        "ignore" => Ignore,
        "kill-line" => KillLine,
        "kill-word" => KillWord,
        "next-history" => NextHistory,
        "page-down" => PageDown,
        "page-up" => PageUp,
        "previous-history" => PreviousHistory,
        "select-all" => SelectAll,
        "toggle" => Toggle,
        "toggle-all" => ToggleAll,
        "toggle-down" => ToggleDown,
        "toggle-sort" => ToggleSort,
        "toggle-up" => ToggleUp,
        "unix-line-discard" => UnixLineDiscard,
        "unix-word-rubout" => UnixWordRubout,
        "up" => Up,
        "yank" => Yank,
        _ => return None,
    };
    debug!("parse_action: {raw_action} => {action:?}");
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action() {
        assert_eq!(parse_action("abort"), Some(Action::Abort));
        assert_eq!(parse_action("unix-word-rubout"), Some(Action::UnixWordRubout));
        assert_eq!(parse_action("toggle-sort"), Some(Action::ToggleSort));
        assert_eq!(parse_action("execute"), Some(Action::Execute));
        assert_eq!(parse_action("Abort"), None);
        assert_eq!(parse_action("add-char"), None);
        assert_eq!(parse_action(""), None);
    }
}
