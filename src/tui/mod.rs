//! Terminal UI components and rendering.
//!
//! Session state and dispatch live in [`app`], painting in [`render`], the
//! terminal driver in [`backend`]. The rest are plain state machines with no I/O.

pub use app::App;
pub use backend::{CrosstermEvents, EventSource, Screen, Tui};
pub use mailbox::{Mailbox, Request};

/// Session state and input dispatch
pub mod app;
/// Terminal driver
pub mod backend;
/// Input events and actions
pub mod event;
/// Query line editing
pub mod input;
/// Cursor, scrolling and selection over the results
pub mod item_list;
/// Coalescing redraw requests
pub mod mailbox;
/// Painting
pub mod render;
/// Info line and spinner
pub mod statusline;
/// Display width helpers
pub mod util;
