//! Convenience re-exports of commonly used types.
//!
//! `use skim_term::prelude::*;` brings in what is needed to run a session.

pub use crate::binds::{BindError, Bindings, ExecMap, KeyMap};
pub use crate::history::{FileHistory, History};
pub use crate::matcher::{Matcher, MatcherEvent, ResultSink, SearchBackend};
pub use crate::reader::Reader;
pub use crate::theme::{ColorId, ColorTheme};
pub use crate::tui::backend::{CrosstermEvents, EventSource, Screen, Tui};
pub use crate::tui::event::{Action, InputEvent, MouseGesture, MouseInput};
pub use crate::util::{CommandRunner, ShellRunner};
pub use crate::*;
pub use kanal::{Receiver, Sender, bounded, unbounded};
pub use std::sync::Arc;
