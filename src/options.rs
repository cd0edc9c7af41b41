//! Configuration options for sk-term.
//!
//! `TermOptions` serves library callers through [`TermOptionsBuilder`], the
//! binary through its clap parser (feature `cli`), and tests through `Default`.

use derive_builder::Builder;

/// sk-term - interactive terminal front-end of a fuzzy finder
///
/// Reads candidate lines from stdin and lets you filter, navigate and select them.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(name = "final_build"))]
#[builder(default)]
#[cfg_attr(feature = "cli", derive(clap::Parser))]
#[cfg_attr(
    feature = "cli",
    command(name = "sk-term", args_override_self = true, verbatim_doc_comment, version, about)
)]
pub struct TermOptions {
    //  --- Search ---
    /// Do not sort the results
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Search"))]
    pub no_sort: bool,

    /// Key bound to toggle-sort
    ///
    /// Also shows whether sorting is active in the info line
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Search"))]
    pub toggle_sort: Option<String>,

    //  --- Interface ---
    /// Comma separated list of bindings
    ///
    /// Each binding follows the format `<key>:<action>`.
    ///
    /// **Example**: `sk-term --bind=ctrl-j:accept,ctrl-k:kill-line`
    ///
    /// `execute(...)` runs a command without leaving sk-term, `{}` being replaced
    /// with the quoted current line:
    ///
    /// ```bash
    /// sk-term --bind "f1:execute(less {})"
    /// ```
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Interface", verbatim_doc_comment))]
    pub bind: Vec<String>,

    /// Enable multiple selection
    ///
    /// Uses Tab and S-Tab by default for selection
    #[cfg_attr(feature = "cli", arg(short, long, help_heading = "Interface"))]
    pub multi: bool,

    /// Disable mouse
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_mouse: bool,

    /// Set color theme
    ///
    /// Format: [BASE][,NAME:COLOR...]
    /// BASE is one of dark, light, 16, bw, none
    /// COLOR is a 256-color index or #rrggbb
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface", verbatim_doc_comment))]
    pub color: Option<String>,

    /// Use black background
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub black: bool,

    /// Disable horizontal scroll
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub no_hscroll: bool,

    /// Cycle the results by wrapping around when scrolling
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Interface"))]
    pub cycle: bool,

    //  --- Layout ---
    /// Display from the top of the screen
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Layout"))]
    pub reverse: bool,

    /// Set prompt
    #[cfg_attr(feature = "cli", arg(long, default_value = "> ", help_heading = "Layout"))]
    pub prompt: String,

    /// Display the info next to the query
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Layout"))]
    pub inline_info: bool,

    //  --- History ---
    /// History file
    ///
    /// Load search history from the specified file and update the file on completion.
    ///
    /// When enabled, CTRL-N and CTRL-P are automatically remapped
    /// to next-history and previous-history.
    #[cfg_attr(feature = "cli", arg(long, help_heading = "History", verbatim_doc_comment))]
    pub history: Option<String>,

    /// Maximum number of query history entries to keep
    #[cfg_attr(feature = "cli", arg(long, default_value = "1000", help_heading = "History"))]
    pub history_size: usize,

    //  --- Scripting ---
    /// Initial query
    #[cfg_attr(feature = "cli", arg(long, short, help_heading = "Scripting"))]
    pub query: Option<String>,

    /// Comma-separated list of keys that accept and are printed before the selection
    #[cfg_attr(feature = "cli", arg(long, value_delimiter = ',', help_heading = "Scripting"))]
    pub expect: Vec<String>,

    /// Print the query as the first line
    #[cfg_attr(feature = "cli", arg(long, help_heading = "Scripting"))]
    pub print_query: bool,
}

impl Default for TermOptions {
    fn default() -> Self {
        Self {
            no_sort: false,
            toggle_sort: None,
            bind: Vec::new(),
            multi: false,
            no_mouse: false,
            color: None,
            black: false,
            no_hscroll: false,
            cycle: false,
            reverse: false,
            prompt: String::from("> "),
            inline_info: false,
            history: None,
            history_size: 1000,
            query: None,
            expect: Vec::new(),
            print_query: false,
        }
    }
}

impl TermOptionsBuilder {
    /// Builds the TermOptions from the builder
    pub fn build(&mut self) -> Result<TermOptions, TermOptionsBuilderError> {
        self.final_build()
    }
}

impl TermOptions {
    /// Whether items are drawn with horizontal scrolling to keep matches visible
    pub fn hscroll(&self) -> bool {
        !self.no_hscroll
    }

    /// Whether the sort flag can be toggled at runtime
    pub fn sort_toggleable(&self) -> bool {
        self.toggle_sort.is_some()
    }
}
