//! Module containing sk-term's entry point
//!
//! A session runs on several threads sharing one [`App`] behind a mutex:
//!
//! - the input thread reads events and dispatches them,
//! - the calling thread waits on the [`Mailbox`] and paints,
//! - small producers post redraws: a deferred first refresh, `SIGWINCH`, the spinner,
//! - the search backend reports through a [`TermHandle`].
//!
//! Nobody posts to the mailbox while holding the state lock.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use signal_hook::consts::SIGWINCH;
use signal_hook::iterator::Signals;

use crate::history::{FileHistory, History};
use crate::item::ResultView;
use crate::matcher::{ResultSink, SearchBackend};
use crate::options::TermOptions;
use crate::output::TermOutput;
use crate::tui::app::{App, Exit};
use crate::tui::backend::{EventSource, Screen};
use crate::tui::mailbox::{Mailbox, Request};
use crate::tui::statusline::SPINNER_DURATION;
use crate::util::{CommandRunner, ShellRunner};

/// Delay before repaints start reaching the terminal
pub const REFRESH_DELAY: Duration = Duration::from_millis(100);

fn lock(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backend side of a running session
#[derive(Clone)]
pub struct TermHandle {
    app: Arc<Mutex<App>>,
    mailbox: Arc<Mailbox>,
}

impl TermHandle {
    /// Number of items read so far, `is_final` once reading is over
    pub fn update_count(&self, count: usize, is_final: bool) {
        let requests = lock(&self.app).update_count(count, is_final);
        self.mailbox.post(requests);
    }

    /// Progress of the running search, in `[0, 1]`
    pub fn update_progress(&self, fraction: f32) {
        let requests = lock(&self.app).update_progress(fraction);
        self.mailbox.post(requests);
    }

    /// New ranked results
    pub fn update_list(&self, results: Arc<dyn ResultView>) {
        let requests = lock(&self.app).update_list(results);
        self.mailbox.post(requests);
    }

    /// Current query text
    pub fn query(&self) -> String {
        lock(&self.app).input.text()
    }

    /// Asks the render thread for `requests`
    pub fn post(&self, requests: Request) {
        self.mailbox.post(requests);
    }

    /// Runs `f` on the session state
    pub fn with_app<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        f(&mut lock(&self.app))
    }
}

impl ResultSink for TermHandle {
    fn update_count(&self, count: usize, is_final: bool) {
        TermHandle::update_count(self, count, is_final);
    }

    fn update_progress(&self, fraction: f32) {
        TermHandle::update_progress(self, fraction);
    }

    fn update_list(&self, results: Arc<dyn ResultView>) {
        TermHandle::update_list(self, results);
    }
}

/// Main entry point for running sk-term
pub struct Skim {
    app: Arc<Mutex<App>>,
    mailbox: Arc<Mailbox>,
}

impl Skim {
    /// Sets up a session on `screen`, with the history file and shell runner the options ask for
    pub fn new(options: &TermOptions, screen: Box<dyn Screen>) -> Result<Self> {
        let history = match &options.history {
            Some(path) => {
                let history = FileHistory::load(path, options.history_size)
                    .wrap_err_with(|| format!("failed to read history file {path}"))?;
                Some(Box::new(history) as Box<dyn History>)
            }
            None => None,
        };
        Self::with_collaborators(options, screen, history, Box::new(ShellRunner))
    }

    /// Sets up a session with explicit collaborators
    pub fn with_collaborators(
        options: &TermOptions,
        screen: Box<dyn Screen>,
        history: Option<Box<dyn History>>,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self> {
        let app = App::from_options(options, screen, history, runner).wrap_err("invalid key binding")?;
        Ok(Self {
            app: Arc::new(Mutex::new(app)),
            mailbox: Arc::new(Mailbox::new()),
        })
    }

    /// Handle for the search backend
    pub fn handle(&self) -> TermHandle {
        TermHandle {
            app: self.app.clone(),
            mailbox: self.mailbox.clone(),
        }
    }

    /// Runs the session until accept or abort.
    ///
    /// Blocks the calling thread, which does all the painting. The history is
    /// appended to on accept.
    pub fn run(self, events: impl EventSource + 'static, backend: Arc<dyn SearchBackend>) -> Result<TermOutput> {
        lock(&self.app).start()?;
        let closed = Arc::new(AtomicBool::new(false));

        //------------------------------------------------------------------------------
        // producers
        let mailbox = self.mailbox.clone();
        thread::spawn(move || {
            thread::sleep(REFRESH_DELAY);
            mailbox.post(Request::REFRESH);
        });

        let mut signals = Signals::new([SIGWINCH])?;
        let signals_handle = signals.handle();
        let mailbox = self.mailbox.clone();
        thread::spawn(move || {
            for _ in signals.forever() {
                trace!("SIGWINCH");
                mailbox.post(Request::REDRAW);
            }
        });

        self.spawn_spinner(closed.clone());
        self.spawn_input(events, backend, closed.clone());

        //------------------------------------------------------------------------------
        // painting
        let (exit, output) = loop {
            let requests = self.mailbox.wait();
            let mut app = lock(&self.app);
            if let Some(exit) = app.apply_requests(requests) {
                break (exit, app.output(exit));
            }
        };
        closed.store(true, Ordering::Relaxed);
        signals_handle.close();
        debug!("session ended: {exit:?}");

        if exit == Exit::Accept {
            lock(&self.app).append_history();
        }
        Ok(output)
    }

    fn spawn_spinner(&self, closed: Arc<AtomicBool>) {
        let app = self.app.clone();
        let mailbox = self.mailbox.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(SPINNER_DURATION);
                let reading = lock(&app).status.reading;
                if !reading || closed.load(Ordering::Relaxed) {
                    break;
                }
                mailbox.post(Request::INFO);
            }
            debug!("spinner stopped");
        });
    }

    fn spawn_input(&self, mut events: impl EventSource + 'static, backend: Arc<dyn SearchBackend>, closed: Arc<AtomicBool>) {
        let app = self.app.clone();
        let mailbox = self.mailbox.clone();
        thread::spawn(move || {
            debug!("input thread start");
            while !closed.load(Ordering::Relaxed) {
                let event = match events.next_event() {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("failed to read input: {e}");
                        mailbox.post(Request::QUIT);
                        break;
                    }
                };
                let dispatch = lock(&app).handle_event(&event);
                if let Some(search) = dispatch.search {
                    backend.restart_search(&search.query, search.sort);
                }
                mailbox.post(dispatch.requests);
                if dispatch.requests.intersects(Request::TERMINAL) {
                    break;
                }
            }
            debug!("input thread stop");
        });
    }
}
