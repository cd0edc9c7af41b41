use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use skim_term::AsAny;
use skim_term::history::History;
use skim_term::item::MatchedItems;
use skim_term::matcher;
use skim_term::prelude::*;
use skim_term::tui::app::{App, Exit, SearchRestart};
use skim_term::tui::mailbox::Request;

pub const WIDTH: u16 = 20;
pub const HEIGHT: u16 = 6;

/// Commands handed to `execute`, as `(template, current item)`
pub type Executed = Arc<Mutex<Vec<(String, String)>>>;

struct RecordingRunner(Executed);

impl CommandRunner for RecordingRunner {
    fn run(&self, template: &str, current: &str) {
        self.0.lock().unwrap().push((template.to_string(), current.to_string()));
    }
}

pub fn parse_options(args: &[&str]) -> TermOptions {
    let mut argv = vec!["sk-term"];
    argv.extend_from_slice(args);
    TermOptions::try_parse_from(argv).unwrap()
}

/// A test harness driving an [`App`] drawn on a [`TestBackend`].
///
/// Everything the threads of a real session do is done inline: each event is
/// dispatched, a restarted search is run right away with the reference
/// matcher, and the resulting requests are applied as the render thread would.
pub struct TestHarness {
    pub app: App,
    pub pool: Vec<String>,
    pub searches: Vec<SearchRestart>,
    pub exit: Option<Exit>,
    pub executed: Executed,
}

impl TestHarness {
    pub fn new(items: &[&str], args: &[&str]) -> Self {
        Self::build(items, args, WIDTH, HEIGHT, None)
    }

    pub fn sized(items: &[&str], args: &[&str], width: u16, height: u16) -> Self {
        Self::build(items, args, width, height, None)
    }

    pub fn with_history(items: &[&str], args: &[&str], history: Box<dyn History>) -> Self {
        Self::build(items, args, WIDTH, HEIGHT, Some(history))
    }

    fn build(items: &[&str], args: &[&str], width: u16, height: u16, history: Option<Box<dyn History>>) -> Self {
        let options = parse_options(args);
        let tui = Tui::new(TestBackend::new(width, height)).unwrap();
        let executed = Executed::default();
        let runner = Box::new(RecordingRunner(executed.clone()));
        let mut app = App::from_options(&options, Box::new(tui), history, runner).unwrap();
        app.start().unwrap();

        let mut harness = Self {
            app,
            pool: items.iter().map(|s| s.to_string()).collect(),
            searches: Vec::new(),
            exit: None,
            executed,
        };
        let initial = SearchRestart {
            query: harness.app.input.text(),
            sort: harness.app.sort(),
        };
        harness.search(initial);
        harness
    }

    /// Dispatches one event; events after the end of the session are dropped
    pub fn event(&mut self, event: InputEvent) {
        if self.exit.is_some() {
            return;
        }
        let dispatch = self.app.handle_event(&event);
        if let Some(search) = dispatch.search {
            self.searches.push(search.clone());
            self.search(search);
        }
        self.apply(dispatch.requests);
    }

    fn search(&mut self, search: SearchRestart) {
        let matched = matcher::search(&self.pool, &search.query, search.sort, |_| {});
        let requests = self.app.update_list(MatchedItems::new(matched).into_view())
            | self.app.update_count(self.pool.len(), true);
        self.apply(requests);
    }

    fn apply(&mut self, requests: Request) {
        if let Some(exit) = self.app.apply_requests(requests) {
            self.exit = Some(exit);
        }
    }

    pub fn key(&mut self, code: KeyCode) {
        self.event(InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    pub fn char(&mut self, c: char) {
        self.key(KeyCode::Char(c));
    }

    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.char(c);
        }
    }

    pub fn ctrl(&mut self, c: char) {
        self.event(InputEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)));
    }

    pub fn alt(&mut self, code: KeyCode) {
        self.event(InputEvent::Key(KeyEvent::new(code, KeyModifiers::ALT)));
    }

    pub fn mouse(&mut self, row: usize, col: usize, gesture: MouseGesture, modifier: bool) {
        self.event(InputEvent::Mouse(MouseInput {
            row,
            col,
            gesture,
            modifier,
        }));
    }

    pub fn output(&self) -> TermOutput {
        self.app.output(self.exit.expect("session still running"))
    }

    pub fn tui(&self) -> &Tui<TestBackend> {
        self.app
            .screen()
            .as_any()
            .downcast_ref::<Tui<TestBackend>>()
            .expect("screen is a test backend")
    }

    /// Drawn rows, each prefixed with its screen row number
    pub fn screen_text(&self) -> String {
        let canvas = self.tui().canvas();
        let area = canvas.area;
        (0..area.height)
            .map(|y| {
                let line: String = (0..area.width)
                    .filter_map(|x| canvas.cell((x, y)).map(|cell| cell.symbol()))
                    .collect();
                format!("{y}|{}", line.trim_end())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drawing cursor as `(row, col)`
    pub fn cursor(&self) -> (usize, usize) {
        self.tui().cursor()
    }
}

/// Snapshots the screen of a [`TestHarness`]
#[macro_export]
macro_rules! snap {
    ($harness:expr, @$snapshot:literal) => {
        insta::assert_snapshot!($harness.screen_text(), @$snapshot)
    };
}
