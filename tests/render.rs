#[allow(dead_code)]
#[macro_use]
mod common;

use common::TestHarness;

const FRUITS: [&str; 3] = ["apple", "banana", "cherry"];

#[test]
fn render_default_layout() {
    let h = TestHarness::new(&FRUITS, &[]);
    snap!(h, @r"
    0|
    1|  cherry
    2|  banana
    3|> apple
    4|  3/3
    5|>
    ");
    assert_eq!(h.cursor(), (5, 2));
}

#[test]
fn render_reverse_layout() {
    let h = TestHarness::new(&FRUITS, &["--reverse"]);
    snap!(h, @r"
    0|>
    1|  3/3
    2|> apple
    3|  banana
    4|  cherry
    5|
    ");
    assert_eq!(h.cursor(), (0, 2));
}

#[test]
fn render_inline_info() {
    let h = TestHarness::new(&FRUITS, &["--inline-info"]);
    snap!(h, @r"
    0|
    1|
    2|  cherry
    3|  banana
    4|> apple
    5|>   < 3/3
    ");
}

#[test]
fn render_filtered_list() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    h.type_str("an");
    snap!(h, @r"
    0|
    1|
    2|
    3|> banana
    4|  1/3
    5|> an
    ");
    assert_eq!(h.cursor(), (5, 4));
}

#[test]
fn render_custom_prompt() {
    let h = TestHarness::new(&FRUITS, &["--reverse", "--prompt", "$ ", "-q", "ch"]);
    snap!(h, @r"
    0|$ ch
    1|  1/3
    2|> cherry
    3|
    4|
    5|
    ");
    assert_eq!(h.cursor(), (0, 4));
}

#[test]
fn render_hscroll_keeps_match_visible() {
    let mut h = TestHarness::new(&["0123456789abcdefghijklmnopqrst"], &["--reverse"]);
    h.char('m');
    snap!(h, @r"
    0|> m
    1|  1/1
    2|> ..abcdefghijklm..
    3|
    4|
    5|
    ");
}

#[test]
fn render_no_hscroll_cuts_the_tail() {
    let mut h = TestHarness::new(&["0123456789abcdefghijklmnopqrst"], &["--reverse", "--no-hscroll"]);
    h.char('m');
    snap!(h, @r"
    0|> m
    1|  1/1
    2|> 0123456789abcde..
    3|
    4|
    5|
    ");
}

#[test]
fn render_selection_markers_and_count() {
    let mut h = TestHarness::new(&FRUITS, &["--reverse", "--multi"]);
    h.key(crossterm::event::KeyCode::Tab);
    snap!(h, @r"
    0|>
    1|  3/3 (1)
    2| >apple
    3|> banana
    4|  cherry
    5|
    ");
}

#[test]
fn render_toggle_sort_marker() {
    let mut h = TestHarness::new(&FRUITS, &["--reverse", "--toggle-sort", "ctrl-s"]);
    snap!(h, @r"
    0|>
    1|  3/3/S
    2|> apple
    3|  banana
    4|  cherry
    5|
    ");
    h.ctrl('s');
    assert!(!h.app.sort());
    assert_eq!(h.searches.last().map(|s| s.sort), Some(false));
    assert_eq!(h.screen_text().lines().nth(1), Some("1|  3/3"));
}

#[test]
fn render_scrolls_with_the_cursor() {
    let items = ["1", "2", "3", "4", "5", "6"];
    let mut h = TestHarness::new(&items, &["--reverse"]);
    for _ in 0..5 {
        h.ctrl('j');
    }
    snap!(h, @r"
    0|>
    1|  6/6
    2|  3
    3|  4
    4|  5
    5|> 6
    ");
}

#[test]
fn render_clear_screen_repaints_everything() {
    let mut h = TestHarness::new(&FRUITS, &[]);
    let before = h.screen_text();
    h.ctrl('l');
    assert_eq!(h.screen_text(), before);
}
