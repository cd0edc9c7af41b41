#[allow(dead_code)]
#[macro_use]
mod common;

use std::fs;

use common::TestHarness;
use crossterm::event::KeyCode;
use skim_term::history::FileHistory;
use tempfile::tempdir;

const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];

#[test]
fn history_navigation_restores_edits() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history");
    fs::write(&path, "first\nsecond\n").unwrap();
    let path = path.to_str().unwrap();

    let history = FileHistory::load(path, 100).unwrap();
    let mut h = TestHarness::with_history(&FRUITS, &["--history", path], Box::new(history));
    h.type_str("ch");

    h.ctrl('p');
    assert_eq!(h.app.input.text(), "second");
    assert_eq!(h.searches.last().map(|s| s.query.as_str()), Some("second"));
    h.ctrl('p');
    assert_eq!(h.app.input.text(), "first");
    h.ctrl('p');
    assert_eq!(h.app.input.text(), "first");

    h.key(KeyCode::Backspace);
    h.ctrl('n');
    assert_eq!(h.app.input.text(), "second");
    h.ctrl('p');
    assert_eq!(h.app.input.text(), "firs");
    h.ctrl('n');
    h.ctrl('n');
    assert_eq!(h.app.input.text(), "ch");

    h.key(KeyCode::Enter);
    h.app.append_history();
    assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\nch\n");
}

#[test]
fn history_keys_move_the_list_without_history() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.ctrl('p');
    assert_eq!(h.app.item_list.viewport.cy, 1);
    h.ctrl('n');
    assert_eq!(h.app.item_list.viewport.cy, 0);
    assert_eq!(h.app.input.text(), "");
}
