//! Query line editing.
//!
//! The query is kept as a sequence of chars so that every cursor position is a
//! valid insertion point, with a single-slot yank buffer for killed spans.

/// Transition a word motion or rubout stops at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBoundary {
    /// A whitespace char followed by a non-whitespace char
    Whitespace,
    /// A non-alphanumeric char followed by an alphanumeric char
    Alphanumeric,
}

impl WordBoundary {
    fn matches(self, prev: char, next: char) -> bool {
        match self {
            WordBoundary::Whitespace => prev.is_whitespace() && !next.is_whitespace(),
            WordBoundary::Alphanumeric => !is_word_char(prev) && is_word_char(next),
        }
    }

    /// Start index of the last boundary inside `chars`
    fn find_last(self, chars: &[char]) -> Option<usize> {
        chars.windows(2).rposition(|pair| self.matches(pair[0], pair[1]))
    }
}

/// Check if a character is a word character (alphanumeric only)
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Index of the last char of the first word in `chars`, or of the last char if no word ends earlier
fn find_word_end(chars: &[char]) -> Option<usize> {
    chars
        .windows(2)
        .position(|pair| is_word_char(pair[0]) && !is_word_char(pair[1]))
        .or_else(|| chars.len().checked_sub(1))
}

/// Editable query line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    value: Vec<char>,
    cursor: usize,
    yanked: Vec<char>,
}

impl Input {
    /// Creates a query holding `query`, with the cursor at its end
    pub fn new(query: &str) -> Self {
        let value: Vec<char> = query.chars().collect();
        Self {
            cursor: value.len(),
            value,
            yanked: Vec::new(),
        }
    }

    /// The query as a string
    pub fn text(&self) -> String {
        self.value.iter().collect()
    }

    /// The query as chars
    pub fn chars(&self) -> &[char] {
        &self.value
    }

    /// Chars left of the cursor
    pub fn before_cursor(&self) -> &[char] {
        &self.value[..self.cursor]
    }

    /// Cursor position, in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of chars in the query
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the query is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Content of the yank buffer
    pub fn yanked(&self) -> String {
        self.yanked.iter().collect()
    }

    /// Replaces the whole line, moving the cursor to its end
    pub fn set_text(&mut self, text: &str) {
        self.value = text.chars().collect();
        self.cursor = self.value.len();
    }

    /// Moves the cursor to `pos`, clamped to the line
    pub fn move_cursor_to(&mut self, pos: usize) {
        self.cursor = pos.min(self.value.len());
    }

    /// Moves the cursor to the start of the line
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the line
    pub fn move_to_end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Moves the cursor one char left
    pub fn move_backward(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one char right
    pub fn move_forward(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor += 1;
        }
    }

    /// Inserts `c` before the cursor
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Deletes the char under the cursor, returning whether anything was deleted
    pub fn delete_char(&mut self) -> bool {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
            true
        } else {
            false
        }
    }

    /// Deletes the char before the cursor
    pub fn delete_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.value.remove(self.cursor);
        }
    }

    /// Kills from the start of the line to the cursor
    pub fn kill_to_start(&mut self) {
        if self.cursor > 0 {
            self.yanked = self.value.drain(..self.cursor).collect();
            self.cursor = 0;
        }
    }

    /// Kills from the cursor to the end of the line
    pub fn kill_to_end(&mut self) {
        if self.cursor < self.value.len() {
            self.yanked = self.value.drain(self.cursor..).collect();
        }
    }

    /// Kills back to the last `boundary` before the cursor, or to the start of the line
    pub fn rubout(&mut self, boundary: WordBoundary) {
        if self.cursor == 0 {
            return;
        }
        let start = boundary
            .find_last(&self.value[..self.cursor])
            .map_or(0, |idx| idx + 1);
        self.yanked = self.value.drain(start..self.cursor).collect();
        self.cursor = start;
    }

    /// Moves the cursor to the start of the previous word
    pub fn move_backward_word(&mut self) {
        self.cursor = WordBoundary::Alphanumeric
            .find_last(&self.value[..self.cursor])
            .map_or(0, |idx| idx + 1);
    }

    /// Moves the cursor past the end of the next word
    pub fn move_forward_word(&mut self) {
        if let Some(end) = find_word_end(&self.value[self.cursor..]) {
            self.cursor += end + 1;
        }
    }

    /// Kills from the cursor to the end of the current word
    pub fn kill_word(&mut self) {
        if let Some(end) = find_word_end(&self.value[self.cursor..]) {
            let stop = self.cursor + end + 1;
            self.yanked = self.value.drain(self.cursor..stop).collect();
        }
    }

    /// Re-inserts the last killed span at the cursor
    pub fn yank(&mut self) {
        let at = self.cursor;
        self.value.splice(at..at, self.yanked.iter().copied());
        self.cursor += self.yanked.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input_at(text: &str, cursor: usize) -> Input {
        let mut input = Input::new(text);
        input.move_cursor_to(cursor);
        input
    }

    #[test]
    fn test_insert_and_delete() {
        let mut input = Input::new("ac");
        input.move_backward();
        input.insert('b');
        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor(), 2);

        assert!(input.delete_char());
        assert_eq!(input.text(), "ab");
        assert!(!input.delete_char());

        input.delete_backward();
        assert_eq!(input.text(), "a");
        assert_eq!(input.cursor(), 1);

        input.move_to_start();
        input.delete_backward();
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_multibyte_chars_are_single_positions() {
        let mut input = Input::new("日本語");
        assert_eq!(input.cursor(), 3);
        input.move_backward();
        input.delete_backward();
        assert_eq!(input.text(), "日語");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_backward_kill_word_then_yank() {
        let mut input = Input::new("abc");
        input.rubout(WordBoundary::Alphanumeric);
        assert_eq!(input.text(), "");
        assert_eq!(input.yanked(), "abc");

        input.yank();
        assert_eq!(input.text(), "abc");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_rubout_stops_after_boundary() {
        let mut input = Input::new("foo bar-baz");
        input.rubout(WordBoundary::Alphanumeric);
        assert_eq!(input.text(), "foo bar-");
        assert_eq!(input.yanked(), "baz");

        let mut input = Input::new("foo bar-baz");
        input.rubout(WordBoundary::Whitespace);
        assert_eq!(input.text(), "foo ");
        assert_eq!(input.yanked(), "bar-baz");

        // trailing whitespace belongs to the killed span
        let mut input = Input::new("foo bar  ");
        input.rubout(WordBoundary::Whitespace);
        assert_eq!(input.text(), "foo ");
        assert_eq!(input.yanked(), "bar  ");
    }

    #[test]
    fn test_rubout_at_start_is_noop() {
        let mut input = input_at("abc", 0);
        input.rubout(WordBoundary::Whitespace);
        assert_eq!(input.text(), "abc");
        assert_eq!(input.yanked(), "");
    }

    #[test]
    fn test_word_motions() {
        let mut input = Input::new("foo bar baz");
        input.move_backward_word();
        assert_eq!(input.cursor(), 8);
        input.move_backward_word();
        assert_eq!(input.cursor(), 4);
        input.move_backward_word();
        assert_eq!(input.cursor(), 0);
        input.move_backward_word();
        assert_eq!(input.cursor(), 0);

        input.move_forward_word();
        assert_eq!(input.cursor(), 3);
        input.move_forward_word();
        assert_eq!(input.cursor(), 7);
        input.move_forward_word();
        assert_eq!(input.cursor(), 11);
        input.move_forward_word();
        assert_eq!(input.cursor(), 11);
    }

    #[test]
    fn test_forward_word_on_punctuation_reaches_line_end() {
        let mut input = input_at("--", 0);
        input.move_forward_word();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_kill_word() {
        let mut input = input_at("foo bar", 0);
        input.kill_word();
        assert_eq!(input.text(), " bar");
        assert_eq!(input.yanked(), "foo");
        assert_eq!(input.cursor(), 0);

        input.kill_word();
        assert_eq!(input.text(), "");
        assert_eq!(input.yanked(), " bar");

        // nothing after the cursor keeps the previous yank
        input.kill_word();
        assert_eq!(input.yanked(), " bar");
    }

    #[test]
    fn test_line_kills() {
        let mut input = input_at("hello world", 5);
        input.kill_to_end();
        assert_eq!(input.text(), "hello");
        assert_eq!(input.yanked(), " world");

        input.move_cursor_to(2);
        input.kill_to_start();
        assert_eq!(input.text(), "llo");
        assert_eq!(input.yanked(), "he");
        assert_eq!(input.cursor(), 0);

        input.move_to_end();
        input.yank();
        assert_eq!(input.text(), "llohe");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn test_move_cursor_to_is_clamped() {
        let mut input = Input::new("abc");
        input.move_cursor_to(42);
        assert_eq!(input.cursor(), 3);
        input.set_text("longer text");
        assert_eq!(input.cursor(), 11);
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Insert(char),
        DeleteChar,
        DeleteBackward,
        MoveToStart,
        MoveToEnd,
        MoveBackward,
        MoveForward,
        MoveBackwardWord,
        MoveForwardWord,
        KillToStart,
        KillToEnd,
        Rubout(WordBoundary),
        KillWord,
        Yank,
        SetText(String),
        MoveCursorTo(usize),
    }

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            prop::sample::select(vec!['a', 'Z', '9', ' ', '-', '\t', '漢']).prop_map(Edit::Insert),
            Just(Edit::DeleteChar),
            Just(Edit::DeleteBackward),
            Just(Edit::MoveToStart),
            Just(Edit::MoveToEnd),
            Just(Edit::MoveBackward),
            Just(Edit::MoveForward),
            Just(Edit::MoveBackwardWord),
            Just(Edit::MoveForwardWord),
            Just(Edit::KillToStart),
            Just(Edit::KillToEnd),
            Just(Edit::Rubout(WordBoundary::Whitespace)),
            Just(Edit::Rubout(WordBoundary::Alphanumeric)),
            Just(Edit::KillWord),
            Just(Edit::Yank),
            "[a-z 日本]{0,12}".prop_map(Edit::SetText),
            (0usize..30).prop_map(Edit::MoveCursorTo),
        ]
    }

    fn apply(input: &mut Input, edit: &Edit) {
        match edit {
            Edit::Insert(c) => input.insert(*c),
            Edit::DeleteChar => {
                input.delete_char();
            }
            Edit::DeleteBackward => input.delete_backward(),
            Edit::MoveToStart => input.move_to_start(),
            Edit::MoveToEnd => input.move_to_end(),
            Edit::MoveBackward => input.move_backward(),
            Edit::MoveForward => input.move_forward(),
            Edit::MoveBackwardWord => input.move_backward_word(),
            Edit::MoveForwardWord => input.move_forward_word(),
            Edit::KillToStart => input.kill_to_start(),
            Edit::KillToEnd => input.kill_to_end(),
            Edit::Rubout(boundary) => input.rubout(*boundary),
            Edit::KillWord => input.kill_word(),
            Edit::Yank => input.yank(),
            Edit::SetText(text) => input.set_text(text),
            Edit::MoveCursorTo(pos) => input.move_cursor_to(*pos),
        }
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(
            initial in "[a-z -]{0,10}",
            edits in proptest::collection::vec(edit(), 0..64),
        ) {
            let mut input = Input::new(&initial);
            for edit in &edits {
                apply(&mut input, edit);
                prop_assert!(input.cursor() <= input.len(), "{:?} left cursor at {} of {}", edit, input.cursor(), input.len());
                prop_assert_eq!(input.before_cursor().len(), input.cursor());
            }
        }
    }
}
