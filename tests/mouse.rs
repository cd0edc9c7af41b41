#[allow(dead_code)]
#[macro_use]
mod common;

use common::TestHarness;
use crossterm::event::KeyCode;
use skim_term::prelude::MouseGesture::{Click, DoubleClick, Wheel};
use skim_term::tui::app::Exit;

const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];

#[test]
fn mouse_click_moves_the_list_cursor() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    // default layout: cherry is drawn on screen row 1
    h.mouse(1, 5, Click, false);
    assert_eq!(h.app.item_list.viewport.cy, 2);
    assert_eq!(h.exit, None);
    h.key(KeyCode::Enter);
    assert_eq!(h.output().selected, vec!["cherry"]);
}

#[test]
fn mouse_click_in_reverse_layout() {
    let mut h = TestHarness::new(&FRUITS, &["--reverse"]);
    h.mouse(3, 0, Click, false);
    assert_eq!(h.app.item_list.viewport.cy, 1);
}

#[test]
fn mouse_click_on_info_line_is_ignored() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.mouse(2, 0, Click, false);
    h.mouse(4, 3, Click, false);
    assert_eq!(h.app.item_list.viewport.cy, 1);
}

#[test]
fn mouse_click_on_prompt_moves_the_query_cursor() {
    let mut h = TestHarness::new(&FRUITS, &["-q", "abc"]);
    h.mouse(5, 3, Click, false);
    assert_eq!(h.app.input.cursor(), 1);
    h.char('x');
    assert_eq!(h.app.input.text(), "axbc");

    h.mouse(5, 0, Click, false);
    assert_eq!(h.app.input.cursor(), 0);
    h.mouse(5, 19, Click, false);
    assert_eq!(h.app.input.cursor(), 4);
}

#[test]
fn mouse_double_click_accepts_the_row() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.mouse(2, 4, DoubleClick, false);
    assert_eq!(h.exit, Some(Exit::Accept));
    assert_eq!(h.output().selected, vec!["banana"]);
}

#[test]
fn mouse_double_click_past_the_list_does_not_accept() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.mouse(0, 4, DoubleClick, false);
    assert_eq!(h.exit, None);
    h.mouse(4, 4, DoubleClick, false);
    assert_eq!(h.exit, None);
}

#[test]
fn mouse_modifier_click_toggles_in_multi_mode() {
    let mut h = TestHarness::new(&FRUITS, &["--multi"]);
    h.mouse(2, 4, Click, true);
    assert!(h.app.item_list.selection.contains(1));
    h.mouse(2, 4, Click, true);
    assert!(h.app.item_list.selection.is_empty());
    h.mouse(2, 4, Click, false);
    assert!(h.app.item_list.selection.is_empty());
}

#[test]
fn mouse_wheel_scrolls() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.mouse(3, 0, Wheel(1), false);
    assert_eq!(h.app.item_list.viewport.cy, 1);
    h.mouse(3, 0, Wheel(-1), false);
    assert_eq!(h.app.item_list.viewport.cy, 0);
}

#[test]
fn mouse_wheel_with_modifier_toggles_then_moves() {
    let mut h = TestHarness::new(&FRUITS, &["--multi"]);
    h.mouse(3, 0, Wheel(1), true);
    assert_eq!(h.app.item_list.viewport.cy, 1);
    assert!(h.app.item_list.selection.contains(0));
    assert_eq!(h.screen_text().lines().nth(4), Some("4|  3/3 (1)"));
}

#[test]
fn mouse_wheel_on_empty_list_is_ignored() {
    let mut h = TestHarness::new(&FRUITS, &["--multi"]);
    h.type_str("zzz");
    h.mouse(3, 0, Wheel(1), true);
    assert_eq!(h.app.item_list.viewport.cy, 0);
    assert!(h.app.item_list.selection.is_empty());
}
