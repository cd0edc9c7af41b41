//! Handle the color theme
use ratatui::style::{Color, Style};

/// Role of a piece of text on screen, mapped to a style by the [`ColorTheme`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorId {
    /// Non-current lines and the query text
    Normal,
    /// Prompt label and the inline info separator when idle
    Prompt,
    /// Matched text on non-current lines
    Match,
    /// Current line, non-matched text
    Current,
    /// Current line, matched text
    CurrentMatch,
    /// Spinner and the inline info separator while reading
    Spinner,
    /// Info text
    Info,
    /// Cursor marker on the current line
    Cursor,
    /// Selection marker
    Selected,
}

/// The color scheme of the terminal
///
/// <pre>
/// +----------------+
/// |\ 8/10          |  --> spinner & info
/// | >selected line |  --> selected & normal & matched
/// |> current line  |  --> cursor & current & current_match
/// |  normal line   |
/// |> query         |  --> prompt & normal
/// +----------------+
/// </pre>
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTheme {
    /// Non-selected lines and general text
    pub normal: Style,
    /// Matched text on non-current lines
    pub matched: Style,
    /// Current line, non-matched text
    pub current: Style,
    /// Current line, matched text
    pub current_match: Style,
    /// Spinner
    pub spinner: Style,
    /// Info (outside of spinner)
    pub info: Style,
    /// Prompt prefix
    pub prompt: Style,
    /// Cursor/pointer (prefix of current item)
    pub cursor: Style,
    /// Multi-selection marker
    pub selected: Style,
}

impl ColorTheme {
    /// Picks the theme from a `--color` value, honoring `NO_COLOR` when none is given
    pub fn init(color: Option<&str>) -> ColorTheme {
        match color {
            Some(color) => ColorTheme::from_spec(color),
            None => match std::env::var_os("NO_COLOR") {
                Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
                _ => ColorTheme::dark256(),
            },
        }
    }

    /// Style used for `id`
    pub fn style(&self, id: ColorId) -> Style {
        match id {
            ColorId::Normal => self.normal,
            ColorId::Prompt => self.prompt,
            ColorId::Match => self.matched,
            ColorId::Current => self.current,
            ColorId::CurrentMatch => self.current_match,
            ColorId::Spinner => self.spinner,
            ColorId::Info => self.info,
            ColorId::Cursor => self.cursor,
            ColorId::Selected => self.selected,
        }
    }

    /// Paints a black background wherever the theme leaves the terminal's default
    pub fn with_black_background(mut self) -> Self {
        for style in [
            &mut self.normal,
            &mut self.matched,
            &mut self.spinner,
            &mut self.info,
            &mut self.prompt,
            &mut self.cursor,
            &mut self.selected,
        ] {
            if style.bg.is_none() {
                *style = style.bg(Color::Black);
            }
        }
        self
    }

    /// No colors at all, only attributes
    pub fn none() -> Self {
        Self {
            spinner: Style::default().bold(),
            ..ColorTheme::default()
        }
    }

    /// Monochrome, with reverse video on the current line
    pub fn bw() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.underlined(),
            current: base.current.reversed(),
            current_match: base.current_match.reversed().underlined(),
            ..base
        }
    }

    /// The 16 base terminal colors
    pub fn default16() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Green),
            current: base.current.fg(Color::Yellow).bg(Color::Black),
            current_match: base.current_match.fg(Color::Green).bg(Color::Black),
            spinner: base.spinner.fg(Color::Green),
            info: base.info.fg(Color::White),
            prompt: base.prompt.fg(Color::Blue),
            cursor: base.cursor.fg(Color::Red).bg(Color::Black),
            selected: base.selected.fg(Color::Magenta).bg(Color::Black),
            ..base
        }
    }

    /// 256 colors, for dark terminals
    pub fn dark256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(108)),
            current: base.current.fg(Color::Indexed(254)).bg(Color::Indexed(236)),
            current_match: base.current_match.fg(Color::Indexed(151)).bg(Color::Indexed(236)),
            spinner: base.spinner.fg(Color::Indexed(148)),
            info: base.info.fg(Color::Indexed(144)),
            prompt: base.prompt.fg(Color::Indexed(110)),
            cursor: base.cursor.fg(Color::Indexed(161)).bg(Color::Indexed(236)),
            selected: base.selected.fg(Color::Indexed(168)).bg(Color::Indexed(236)),
            ..base
        }
    }

    /// 256 colors, for light terminals
    pub fn light256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.fg(Color::Indexed(0)).bg(Color::Indexed(220)),
            current: base.current.bg(Color::Indexed(251)),
            current_match: base.current_match.fg(Color::Indexed(66)).bg(Color::Indexed(251)),
            spinner: base.spinner.fg(Color::Indexed(65)),
            info: base.info.fg(Color::Indexed(101)),
            prompt: base.prompt.fg(Color::Indexed(25)),
            cursor: base.cursor.fg(Color::Indexed(161)).bg(Color::Indexed(251)),
            selected: base.selected.fg(Color::Indexed(168)).bg(Color::Indexed(251)),
            ..base
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "light" => ColorTheme::light256(),
            "16" => ColorTheme::default16(),
            "bw" => ColorTheme::bw(),
            "none" | "empty" => ColorTheme::none(),
            "dark" | "default" => ColorTheme::dark256(),
            t => {
                debug!("Unknown color theme '{t}'");
                ColorTheme::dark256()
            }
        }
    }

    /// Parses `base[,name:color...]`, where `color` is a 256-color index or `#rrggbb`
    fn from_spec(spec: &str) -> Self {
        let mut theme = ColorTheme::dark256();
        for part in spec.split(',') {
            match part.split_once(':') {
                Some((name, color)) => theme.set_color(name, color),
                None => theme = ColorTheme::from_name(part),
            }
        }
        theme
    }

    fn set_color(&mut self, name: &str, color: &str) {
        let Some(color) = parse_color(color) else {
            debug!("Unknown color '{color}'");
            return;
        };
        match name {
            "fg" | "normal" => self.normal = self.normal.fg(color),
            "bg" => self.normal = self.normal.bg(color),
            "hl" | "matched" => self.matched = self.matched.fg(color),
            "fg+" | "current" => self.current = self.current.fg(color),
            "bg+" => {
                self.current = self.current.bg(color);
                self.current_match = self.current_match.bg(color);
            }
            "hl+" | "current_match" => self.current_match = self.current_match.fg(color),
            "info" => self.info = self.info.fg(color),
            "prompt" => self.prompt = self.prompt.fg(color),
            "pointer" | "cursor" => self.cursor = self.cursor.fg(color),
            "marker" | "selected" => self.selected = self.selected.fg(color),
            "spinner" => self.spinner = self.spinner.fg(color),
            n => debug!("Unknown color component '{n}'"),
        }
    }
}

fn parse_color(raw: &str) -> Option<Color> {
    if let Some(hex) = raw.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else {
        raw.parse::<u8>().ok().map(Color::Indexed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    #[test]
    fn test_named_themes() {
        assert_eq!(ColorTheme::from_spec("bw"), ColorTheme::bw());
        assert_eq!(ColorTheme::from_spec("16"), ColorTheme::default16());
        assert_eq!(ColorTheme::from_spec("none"), ColorTheme::none());
        assert_eq!(ColorTheme::from_spec("unknown"), ColorTheme::dark256());
        assert!(ColorTheme::none().spinner.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_overrides_apply_on_top_of_base() {
        let theme = ColorTheme::from_spec("16,prompt:#ff0000,hl:33,bg+:235");
        assert_eq!(theme.prompt.fg, Some(Color::Rgb(255, 0, 0)));
        assert_eq!(theme.matched.fg, Some(Color::Indexed(33)));
        assert_eq!(theme.current.bg, Some(Color::Indexed(235)));
        assert_eq!(theme.current_match.bg, Some(Color::Indexed(235)));
        assert_eq!(theme.info, ColorTheme::default16().info);
    }

    #[test]
    fn test_invalid_colors_are_ignored() {
        let theme = ColorTheme::from_spec("none,prompt:#zzzzzz,info:300,nope:1");
        assert_eq!(theme, ColorTheme::none());
    }

    #[test]
    fn test_non_ascii_hex_colors_are_ignored() {
        let theme = ColorTheme::from_spec("none,prompt:#aé123,info:#ffé,spinner:#12345é");
        assert_eq!(theme, ColorTheme::none());
        assert_eq!(parse_color("#aé123"), None);
        assert_eq!(parse_color("#abc"), None);
    }

    #[test]
    fn test_black_background_keeps_explicit_backgrounds() {
        let theme = ColorTheme::dark256().with_black_background();
        assert_eq!(theme.normal.bg, Some(Color::Black));
        assert_eq!(theme.prompt.bg, Some(Color::Black));
        assert_eq!(theme.cursor.bg, Some(Color::Indexed(236)));
        assert_eq!(theme.current.bg, Some(Color::Indexed(236)));
    }

    #[test]
    fn test_style_lookup() {
        let theme = ColorTheme::default16();
        assert_eq!(theme.style(ColorId::Prompt), theme.prompt);
        assert_eq!(theme.style(ColorId::CurrentMatch), theme.current_match);
        assert_eq!(theme.style(ColorId::Selected), theme.selected);
    }
}
