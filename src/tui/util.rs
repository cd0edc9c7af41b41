use std::collections::HashMap;

use unicode_display_width::is_double_width;

/// Columns between two tab stops
pub const TAB_STOP: usize = 8;

// Directly taken from https://docs.rs/unicode-display-width/0.3.0/src/unicode_display_width/lib.rs.html#77-81
/// Column width of `c`, 2 for wide glyphs
#[inline]
pub fn char_display_width(c: char) -> usize {
    if c == '\u{FE0F}' || is_double_width(c) {
        return 2;
    }
    1
}

/// Memoized terminal column widths.
///
/// Tabs are never memoized since their width depends on the column they start at.
/// Control characters are zero-width, matching what the canvas drops when printing.
#[derive(Debug, Default, Clone)]
pub struct WidthCache {
    widths: HashMap<char, usize>,
}

impl WidthCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of `c` when it starts at column `col`
    pub fn char_width(&mut self, c: char, col: usize) -> usize {
        if c == '\t' {
            return TAB_STOP - col % TAB_STOP;
        }
        *self.widths.entry(c).or_insert_with(|| {
            if c.is_control() {
                0
            } else {
                char_display_width(c)
            }
        })
    }

    /// Width of `chars` printed from column 0
    pub fn display_width(&mut self, chars: &[char]) -> usize {
        chars.iter().fold(0, |col, &c| col + self.char_width(c, col))
    }

    /// Width of `chars` printed after `prefix` columns, stopping early once past `limit`
    pub fn display_width_with_limit(&mut self, chars: &[char], prefix: usize, limit: usize) -> usize {
        let mut width = 0;
        for &c in chars {
            width += self.char_width(c, prefix + width);
            if width > limit {
                break;
            }
        }
        width
    }

    /// Keeps the longest prefix of `chars` fitting in `width` columns.
    ///
    /// Returns the kept prefix and the number of dropped chars.
    pub fn trim_right<'a>(&mut self, chars: &'a [char], width: usize) -> (&'a [char], usize) {
        let mut col = 0;
        for (idx, &c) in chars.iter().enumerate() {
            col += self.char_width(c, col);
            if col > width {
                return (&chars[..idx], chars.len() - idx);
            }
        }
        (chars, 0)
    }

    /// Drops leading chars until the rest, printed after `prefix` columns, fits in `width` columns.
    ///
    /// Returns the kept suffix and the number of dropped chars.
    pub fn trim_left<'a>(&mut self, chars: &'a [char], width: usize, prefix: usize) -> (&'a [char], usize) {
        let has_tabs = chars.contains(&'\t');
        let mut current = self.display_width_with_limit(chars, prefix, usize::MAX);
        let mut trimmed = 0;
        while current > width && trimmed < chars.len() {
            let dropped = chars[trimmed];
            trimmed += 1;
            if has_tabs {
                // tab widths shift with every dropped char
                current = self.display_width_with_limit(&chars[trimmed..], prefix, width);
            } else {
                current -= self.char_width(dropped, 0);
            }
        }
        (&chars[trimmed..], trimmed)
    }

    /// Replaces tabs with spaces up to the next tab stop, given the column the text starts at.
    ///
    /// Returns the expanded text and the column reached after it.
    pub fn expand_tabs(&mut self, chars: &[char], prefix: usize) -> (String, usize) {
        let mut out = String::with_capacity(chars.len());
        let mut col = prefix;
        for &c in chars {
            let w = self.char_width(c, col);
            col += w;
            if c == '\t' {
                out.extend(std::iter::repeat_n(' ', w));
            } else {
                out.push(c);
            }
        }
        (out, col)
    }
}
