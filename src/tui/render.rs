//! Painting the prompt, info line and result list.
//!
//! Row 0 is the prompt, followed by the info line unless it is inline, then the
//! list. In the default layout rows count up from the bottom of the screen; the
//! reversed layout counts down from the top.

use std::time::Duration;

use crate::item::Item;
use crate::theme::ColorId;
use crate::tui::backend::Screen;
use crate::tui::input::Input;
use crate::tui::item_list::ItemList;
use crate::tui::statusline::{StatusInfo, spinner_frame};
use crate::tui::util::WidthCache;

const ELLIPSIS: [char; 2] = ['.', '.'];
const ELLIPSIS_WIDTH: usize = 2;

/// Text to paint for one item, with its match spans clamped to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// Chars to print, ellipses included
    pub text: Vec<char>,
    /// Match spans as char ranges of `text`
    pub offsets: Vec<(usize, usize)>,
}

/// Fits `text` in `max_width` columns, keeping the matches visible when `hscroll` is set.
///
/// Text wider than `max_width` loses its tail, or its head when the last match
/// would not fit otherwise, and an ellipsis marks each cut.
pub fn truncate(
    widths: &mut WidthCache,
    text: &[char],
    offsets: &[(usize, usize)],
    max_width: usize,
    hscroll: bool,
) -> Truncated {
    let full_width = widths.display_width(text);
    let mut spans: Vec<(isize, isize)> = offsets.iter().map(|&(b, e)| (b as isize, e as isize)).collect();
    let mut out: Vec<char>;

    if full_width <= max_width {
        out = text.to_vec();
    } else if max_width < ELLIPSIS_WIDTH {
        // no room for an ellipsis
        let (kept, _) = widths.trim_right(text, max_width);
        out = kept.to_vec();
    } else {
        let avail = max_width.saturating_sub(ELLIPSIS_WIDTH);
        let match_end = offsets.iter().map(|&(_, e)| e).max().unwrap_or(0).min(text.len());
        let match_end_width = widths.display_width(&text[..match_end]);

        if hscroll && match_end_width > avail {
            let mut cut = text.to_vec();
            if match_end_width + ELLIPSIS_WIDTH < full_width {
                cut.truncate(match_end);
                cut.extend(ELLIPSIS);
            }
            let (kept, diff) = widths.trim_left(&cut, avail, ELLIPSIS_WIDTH);
            let shift = ELLIPSIS_WIDTH as isize - diff as isize;
            for span in spans.iter_mut() {
                let b = (span.0 + shift).max(ELLIPSIS_WIDTH as isize);
                let e = (span.1 + shift).max(b);
                *span = (b, e);
            }
            out = ELLIPSIS.to_vec();
            out.extend_from_slice(kept);
        } else {
            let (kept, _) = widths.trim_right(text, avail);
            out = kept.to_vec();
            out.extend(ELLIPSIS);
            if !hscroll {
                for span in spans.iter_mut() {
                    *span = (span.0.min(avail as isize), span.1.min(max_width as isize));
                }
            }
        }
    }

    let len = out.len() as isize;
    let offsets = spans
        .into_iter()
        .map(|(b, e)| {
            let b = b.clamp(0, len);
            (b as usize, e.clamp(b, len) as usize)
        })
        .collect();
    Truncated { text: out, offsets }
}

/// Paints the session state onto a [`Screen`]
#[derive(Debug, Clone)]
pub struct Renderer {
    prompt: String,
    prompt_width: usize,
    inline_info: bool,
    reverse: bool,
    hscroll: bool,
    widths: WidthCache,
}

impl Renderer {
    /// Creates a renderer for `prompt` and the given layout flags
    pub fn new(prompt: &str, inline_info: bool, reverse: bool, hscroll: bool) -> Self {
        let mut widths = WidthCache::new();
        let chars: Vec<char> = prompt.chars().collect();
        let prompt_width = widths.display_width(&chars);
        Self {
            prompt: prompt.to_string(),
            prompt_width,
            inline_info,
            reverse,
            hscroll,
            widths,
        }
    }

    /// Number of list rows that fit on screen
    pub fn max_items(&self, screen: &dyn Screen) -> usize {
        let reserved = if self.inline_info { 1 } else { 2 };
        screen.max_rows().saturating_sub(reserved)
    }

    /// Screen row of layout row `y`
    pub fn screen_row(&self, screen: &dyn Screen, y: usize) -> usize {
        if self.reverse {
            y
        } else {
            screen.max_rows().saturating_sub(y + 1)
        }
    }

    /// Layout row of screen row `row`, the inverse of [`Renderer::screen_row`]
    pub fn layout_row(&self, screen: &dyn Screen, row: usize) -> isize {
        if self.reverse {
            row as isize
        } else {
            screen.max_rows() as isize - row as isize - 1
        }
    }

    /// Layout row of the first list item
    pub fn list_start(&self) -> usize {
        if self.inline_info { 1 } else { 2 }
    }

    /// Whether the info line shares the prompt row
    pub fn inline_info(&self) -> bool {
        self.inline_info
    }

    /// Display width of the prompt
    pub fn prompt_width(&self) -> usize {
        self.prompt_width
    }

    fn move_to(&self, screen: &mut dyn Screen, y: usize, x: usize, clear: bool) {
        let row = self.screen_row(screen, y);
        screen.move_cursor(row, x, clear);
    }

    /// Paints the prompt and the query
    pub fn print_prompt(&mut self, screen: &mut dyn Screen, input: &Input) {
        self.move_to(screen, 0, 0, true);
        screen.print(ColorId::Prompt, true, &self.prompt);
        screen.print(ColorId::Normal, true, &input.text());
    }

    /// Puts the drawing cursor where the query cursor is
    pub fn place_cursor(&mut self, screen: &mut dyn Screen, input: &Input) {
        let col = self.prompt_width + self.widths.display_width(input.before_cursor());
        self.move_to(screen, 0, col, false);
    }

    /// Paints the match counts, spinner and progress
    pub fn print_info(
        &mut self,
        screen: &mut dyn Screen,
        input: &Input,
        info: &StatusInfo,
        reading: bool,
        clock: Duration,
    ) {
        if self.inline_info {
            let col = self.prompt_width + self.widths.display_width(input.chars()) + 1;
            self.move_to(screen, 0, col, true);
            let color = if reading { ColorId::Spinner } else { ColorId::Prompt };
            screen.print(color, true, " < ");
        } else {
            self.move_to(screen, 1, 0, true);
            if reading {
                screen.print(ColorId::Spinner, true, spinner_frame(clock));
            }
            self.move_to(screen, 1, 2, false);
        }
        screen.print(ColorId::Info, false, &info.text());
    }

    /// Paints the visible slice of `list`
    pub fn print_list(&mut self, screen: &mut dyn Screen, list: &mut ItemList, multi: bool) {
        let max_items = self.max_items(screen);
        list.constrain(max_items);
        let offset = list.viewport.offset;
        let current = list.viewport.cy;
        let start = self.list_start();
        for i in 0..max_items {
            self.move_to(screen, start + i, 0, true);
            if let Some(item) = list.get(offset + i) {
                let selected = multi && list.selection.contains(item.id);
                self.print_item(screen, item, offset + i == current, selected);
            }
        }
    }

    /// Paints `item` with its cursor and selection markers
    pub fn print_item(&mut self, screen: &mut dyn Screen, item: &Item, current: bool, selected: bool) {
        if current {
            screen.print(ColorId::Cursor, true, ">");
            if selected {
                screen.print(ColorId::Selected, true, ">");
            } else {
                screen.print(ColorId::Current, true, " ");
            }
            self.print_highlighted(screen, item, ColorId::Current, ColorId::CurrentMatch, true);
        } else {
            screen.print(ColorId::Cursor, true, " ");
            if selected {
                screen.print(ColorId::Selected, true, ">");
            } else {
                screen.print(ColorId::Normal, false, " ");
            }
            self.print_highlighted(screen, item, ColorId::Normal, ColorId::Match, false);
        }
    }

    fn print_highlighted(&mut self, screen: &mut dyn Screen, item: &Item, base: ColorId, matched: ColorId, bold: bool) {
        let text: Vec<char> = item.text.chars().collect();
        let max_width = screen.max_cols().saturating_sub(3);
        let Truncated { text, offsets } = truncate(&mut self.widths, &text, &item.offsets, max_width, self.hscroll);

        let len = text.len();
        let mut index = 0;
        let mut col = 0;
        for (b, e) in offsets {
            let b = b.clamp(index, len);
            let e = e.clamp(index, len);
            col = self.paint(screen, &text[index..b], col, base, bold);
            if b < e {
                col = self.paint(screen, &text[b..e], col, matched, bold);
            }
            index = e;
            if index >= len {
                break;
            }
        }
        if index < len {
            self.paint(screen, &text[index..], col, base, bold);
        }
    }

    fn paint(&mut self, screen: &mut dyn Screen, chars: &[char], col: usize, color: ColorId, bold: bool) -> usize {
        let (text, col) = self.widths.expand_tabs(chars, col);
        if !text.is_empty() {
            screen.print(color, bold, &text);
        }
        col
    }
}
