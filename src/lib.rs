//! sk-term is the interactive terminal front-end of a fuzzy finder.
//!
//! It draws a live result list under an editable query line, turns keys and
//! mouse gestures into editing, navigation and selection, and keeps the screen
//! in sync with a search backend that streams results from its own thread.
//!
//! # Examples
//!
//! ```no_run
//! use skim_term::prelude::*;
//! use std::io::Cursor;
//!
//! let options = TermOptionsBuilder::default()
//!     .multi(true)
//!     .build()
//!     .unwrap();
//!
//! let skim = Skim::new(&options, Box::new(Tui::stderr().unwrap())).unwrap();
//! let (matcher, _) = Matcher::spawn(skim.handle(), "", true);
//! Reader::spawn(Cursor::new("awk\nbash\ncsh\ndash\nfish\nksh\nzsh"), matcher.sender());
//!
//! let output = skim.run(CrosstermEvents::new(), Arc::new(matcher)).unwrap();
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

use std::any::Any;

pub use crate::item::{Item, MatchedItems, ResultView};
pub use crate::options::{TermOptions, TermOptionsBuilder};
pub use crate::output::TermOutput;
pub use crate::skim::{Skim, TermHandle};

pub mod binds;
pub mod history;
pub mod item;
pub mod matcher;
pub mod options;
pub mod output;
pub mod prelude;
pub mod reader;
pub mod skim;
pub mod theme;
pub mod tui;
pub mod util;

//------------------------------------------------------------------------------
/// Trait for downcasting to concrete types from trait objects
pub trait AsAny {
    /// Returns a reference to the value as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Returns a mutable reference to the value as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
