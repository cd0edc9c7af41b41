use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time each spinner frame stays on screen
pub const SPINNER_DURATION: Duration = Duration::from_millis(200);
/// Spinner frames, in order
pub const SPINNER: [&str; 8] = ["-", "\\", "|", "/", "-", "\\", "|", "/"];

/// Progress reported by the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    /// Number of items read so far
    pub count: usize,
    /// Whether the backend is still reading items
    pub reading: bool,
    /// Search progress, in percent
    pub progress: u8,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            count: 0,
            reading: true,
            progress: 0,
        }
    }
}

/// Spinner frame to show at wall-clock time `clock`
pub fn spinner_frame(clock: Duration) -> &'static str {
    let frame = SPINNER_DURATION.as_nanos();
    let idx = (clock.as_nanos() % (frame * SPINNER.len() as u128)) / frame;
    SPINNER[idx as usize]
}

/// Time since the unix epoch, zero if the clock is set before it
pub fn wall_clock() -> Duration {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default()
}

/// What the info line says
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Number of results for the current query
    pub matched: usize,
    /// Number of items read
    pub total: usize,
    /// Whether sorting is active, when sorting can be toggled
    pub sort: Option<bool>,
    /// Number of selected items, 0 when multi-selection is disabled
    pub selected: usize,
    /// Search progress, in percent
    pub progress: u8,
}

impl StatusInfo {
    /// Info line text, e.g. `12/100/S (3) (50%)`
    pub fn text(&self) -> String {
        let mut parts = format!("{}/{}", self.matched, self.total);
        match self.sort {
            Some(true) => parts.push_str("/S"),
            Some(false) => parts.push_str("  "),
            None => {}
        }
        if self.selected > 0 {
            parts.push_str(&format!(" ({})", self.selected));
        }
        if self.progress > 0 && self.progress < 100 {
            parts.push_str(&format!(" ({}%)", self.progress));
        }
        parts
    }
}
