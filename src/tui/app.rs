//! Session state and the input dispatcher.
//!
//! [`App`] is the state shared by the input thread, the render thread and the
//! search backend, always behind one lock. Input goes through
//! [`App::handle_event`], which returns the requests to post once the lock is
//! released; the render thread passes what it takes from the mailbox to
//! [`App::apply_requests`].

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::binds::{BindError, Bindings, key_name, normalize_key};
use crate::history::History;
use crate::item::ResultView;
use crate::options::TermOptions;
use crate::output::TermOutput;
use crate::theme::ColorTheme;
use crate::tui::backend::Screen;
use crate::tui::event::{Action, InputEvent, MouseGesture, MouseInput};
use crate::tui::input::{Input, WordBoundary};
use crate::tui::item_list::{ItemList, Viewport};
use crate::tui::mailbox::Request;
use crate::tui::render::Renderer;
use crate::tui::statusline::{Status, StatusInfo, wall_clock};
use crate::util::CommandRunner;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Accepted, exit status 0
    Accept,
    /// Aborted, exit status 1
    Abort,
}

/// A search the backend has to (re)start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRestart {
    /// Committed query text
    pub query: String,
    /// Whether results are to be sorted
    pub sort: bool,
}

/// Side effects of one input event, to be carried out after unlocking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Requests for the render thread
    pub requests: Request,
    /// Search to restart, if the query or the sort flag changed
    pub search: Option<SearchRestart>,
}

/// Application state for sk-term
pub struct App {
    /// Query line
    pub input: Input,
    /// Current results, cursor and selection
    pub item_list: ItemList,
    /// Backend progress
    pub status: Status,
    bindings: Bindings,
    multi: bool,
    sort: bool,
    sort_toggleable: bool,
    black: bool,
    mouse: bool,
    suppress: bool,
    pressed: Option<String>,
    renderer: Renderer,
    theme: ColorTheme,
    screen: Box<dyn Screen>,
    history: Option<Box<dyn History>>,
    runner: Box<dyn CommandRunner>,
}

impl App {
    /// Builds the session state; fails only on invalid key bindings
    pub fn from_options(
        options: &TermOptions,
        screen: Box<dyn Screen>,
        history: Option<Box<dyn History>>,
        runner: Box<dyn CommandRunner>,
    ) -> Result<Self, BindError> {
        let bindings = Bindings::from_options(options)?;
        let renderer = Renderer::new(&options.prompt, options.inline_info, options.reverse, options.hscroll());
        Ok(Self {
            input: Input::new(options.query.as_deref().unwrap_or_default()),
            item_list: ItemList::new(Viewport::new(options.reverse, options.cycle)),
            status: Status::default(),
            bindings,
            multi: options.multi,
            sort: !options.no_sort,
            sort_toggleable: options.sort_toggleable(),
            black: options.black,
            mouse: !options.no_mouse,
            suppress: true,
            pressed: None,
            renderer,
            theme: ColorTheme::init(options.color.as_deref()),
            screen,
            history,
            runner,
        })
    }

    /// The screen being drawn to
    pub fn screen(&self) -> &dyn Screen {
        &*self.screen
    }

    /// Whether results are currently sorted
    pub fn sort(&self) -> bool {
        self.sort
    }

    /// Whether repaints are held back until the first deliberate refresh
    pub fn suppressed(&self) -> bool {
        self.suppress
    }

    /// Takes over the screen and paints the query line and the info line
    pub fn start(&mut self) -> Result<()> {
        self.screen.init(&self.theme, self.black, self.mouse)?;
        self.print_prompt();
        self.place_cursor();
        self.screen.refresh()?;
        self.print_info();
        Ok(())
    }

    //------------------------------------------------------------------------------
    // input

    /// Applies one input event to the state
    pub fn handle_event(&mut self, event: &InputEvent) -> Dispatch {
        let previous_query = self.input.chars().to_vec();
        let mut requests = Request::empty();

        let (action, key) = match event {
            InputEvent::Key(key) => {
                let key = normalize_key(*key);
                if self.bindings.expect.contains(&key) {
                    self.pressed = Some(key_name(&key));
                    requests |= Request::CLOSE;
                }
                (self.resolve_key(&key), Some(key))
            }
            InputEvent::Mouse(mouse) => (Some(Action::Mouse(*mouse)), None),
        };

        let mut search = None;
        if let Some(action) = action {
            debug!("action: {action:?}");
            requests |= Request::PROMPT | self.handle_action(action, key.as_ref());
            if action == Action::ToggleSort {
                search = Some(self.search_restart());
            }
        }
        if search.is_none() && self.input.chars() != previous_query.as_slice() {
            search = Some(self.search_restart());
        }
        Dispatch { requests, search }
    }

    fn search_restart(&self) -> SearchRestart {
        SearchRestart {
            query: self.input.text(),
            sort: self.sort,
        }
    }

    /// Action bound to `key`; plain characters fall back to insertion
    fn resolve_key(&self, key: &KeyEvent) -> Option<Action> {
        if let Some(action) = self.bindings.keymap.get(key) {
            return Some(*action);
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                Some(Action::AddChar(c))
            }
            _ => None,
        }
    }

    fn toggle(&mut self) -> Request {
        if self.item_list.toggle_current() {
            Request::INFO
        } else {
            Request::empty()
        }
    }

    fn handle_action(&mut self, action: Action, key: Option<&KeyEvent>) -> Request {
        use Action::*;
        match action {
            Ignore => {}
            Abort => return Request::QUIT,
            Accept => return Request::CLOSE,
            AddChar(c) => self.input.insert(c),
            BeginningOfLine => self.input.move_to_start(),
            EndOfLine => self.input.move_to_end(),
            BackwardChar => self.input.move_backward(),
            ForwardChar => self.input.move_forward(),
            BackwardWord => self.input.move_backward_word(),
            ForwardWord => self.input.move_forward_word(),
            BackwardDeleteChar => self.input.delete_backward(),
            DeleteChar => return self.delete_char_or_quit(),
            UnixLineDiscard => self.input.kill_to_start(),
            KillLine => self.input.kill_to_end(),
            UnixWordRubout => self.input.rubout(WordBoundary::Whitespace),
            BackwardKillWord => self.input.rubout(WordBoundary::Alphanumeric),
            KillWord => self.input.kill_word(),
            Yank => self.input.yank(),
            ClearScreen => return Request::REDRAW,
            ToggleSort => {
                self.sort = !self.sort;
                return Request::INFO;
            }
            Toggle => {
                if self.multi && !self.item_list.is_empty() {
                    return self.toggle() | Request::LIST;
                }
            }
            ToggleDown | ToggleUp => {
                if self.multi && !self.item_list.is_empty() {
                    let requests = self.toggle();
                    self.item_list.vmove(if action == ToggleDown { -1 } else { 1 });
                    return requests | Request::LIST;
                }
            }
            SelectAll | DeselectAll | ToggleAll => {
                if self.multi {
                    match action {
                        SelectAll => self.item_list.select_all(),
                        DeselectAll => self.item_list.deselect_all(),
                        _ => self.item_list.toggle_all(),
                    }
                    return Request::LIST | Request::INFO;
                }
            }
            Down => {
                self.item_list.vmove(-1);
                return Request::LIST;
            }
            Up => {
                self.item_list.vmove(1);
                return Request::LIST;
            }
            PageUp => {
                self.item_list.vmove(self.page_size());
                return Request::LIST;
            }
            PageDown => {
                self.item_list.vmove(-self.page_size());
                return Request::LIST;
            }
            PreviousHistory | NextHistory => {
                if let Some(history) = self.history.as_mut() {
                    history.override_current(&self.input.text());
                    let line = if action == PreviousHistory {
                        history.previous()
                    } else {
                        history.next()
                    };
                    self.input.set_text(&line);
                }
            }
            Execute => return self.execute(key),
            Mouse(mouse) => return self.handle_mouse(&mouse),
        }
        Request::empty()
    }

    /// Deleting forward on an empty line ends the session like abort does
    fn delete_char_or_quit(&mut self) -> Request {
        if !self.input.delete_char() && self.input.cursor() == 0 {
            Request::QUIT
        } else {
            Request::empty()
        }
    }

    fn page_size(&self) -> isize {
        self.renderer.max_items(&*self.screen) as isize - 1
    }

    fn execute(&mut self, key: Option<&KeyEvent>) -> Request {
        let Some(template) = key.and_then(|k| self.bindings.execmap.get(k)) else {
            return Request::empty();
        };
        let Some(current) = self.item_list.current() else {
            return Request::empty();
        };
        if let Err(e) = self.screen.leave_managed_mode() {
            warn!("failed to release the terminal: {e}");
        }
        self.runner.run(template, &current.text);
        if let Err(e) = self.screen.enter_managed_mode() {
            warn!("failed to take the terminal back: {e}");
        }
        Request::REDRAW
    }

    fn handle_mouse(&mut self, mouse: &MouseInput) -> Request {
        let mx = (mouse.col as isize - self.renderer.prompt_width() as isize).clamp(0, self.input.len() as isize);
        let my = self.renderer.layout_row(&*self.screen, mouse.row);
        let min = self.renderer.list_start() as isize;
        let row = self.item_list.viewport.offset as isize + my - min;

        match mouse.gesture {
            MouseGesture::Wheel(delta) => {
                if self.item_list.is_empty() {
                    return Request::empty();
                }
                let mut requests = Request::LIST;
                if self.multi && mouse.modifier {
                    requests |= self.toggle();
                }
                self.item_list.vmove(delta as isize);
                requests
            }
            MouseGesture::DoubleClick => {
                if my >= min && self.item_list.vset(row) && self.item_list.viewport.cy < self.item_list.len() {
                    return Request::CLOSE;
                }
                Request::empty()
            }
            MouseGesture::Click => {
                if my == 0 {
                    self.input.move_cursor_to(mx as usize);
                    Request::empty()
                } else if my >= min {
                    let mut requests = Request::LIST;
                    if self.item_list.vset(row) && self.multi && mouse.modifier {
                        requests |= self.toggle();
                    }
                    requests
                } else {
                    Request::empty()
                }
            }
        }
    }

    //------------------------------------------------------------------------------
    // backend updates

    /// Records the number of items read so far
    pub fn update_count(&mut self, count: usize, is_final: bool) -> Request {
        self.status.count = count;
        self.status.reading = !is_final;
        if is_final {
            Request::INFO | Request::REFRESH
        } else {
            Request::INFO
        }
    }

    /// Records search progress as a fraction in `[0, 1]`
    pub fn update_progress(&mut self, fraction: f32) -> Request {
        let progress = (fraction.clamp(0.0, 1.0) * 100.0) as u8;
        if progress == self.status.progress {
            return Request::empty();
        }
        self.status.progress = progress;
        Request::INFO
    }

    /// Swaps in a new result snapshot
    pub fn update_list(&mut self, results: Arc<dyn ResultView>) -> Request {
        self.status.progress = 100;
        self.item_list.set_results(results);
        Request::INFO | Request::LIST
    }

    //------------------------------------------------------------------------------
    // rendering

    /// Carries out the requests taken from the mailbox, in priority order
    pub fn apply_requests(&mut self, requests: Request) -> Option<Exit> {
        trace!("requests: {requests:?}");
        if requests.contains(Request::PROMPT) {
            self.print_prompt();
            if self.renderer.inline_info() {
                self.print_info();
            }
        }
        if requests.contains(Request::INFO) {
            self.print_info();
        }
        if requests.contains(Request::LIST) {
            self.print_list();
        }
        if requests.contains(Request::REFRESH) {
            self.suppress = false;
        }
        if requests.contains(Request::REDRAW) {
            if let Err(e) = self.screen.clear() {
                warn!("failed to clear the screen: {e}");
            }
            self.print_all();
        }
        if requests.intersects(Request::TERMINAL) {
            if let Err(e) = self.screen.close() {
                warn!("failed to release the terminal: {e}");
            }
            return Some(if requests.contains(Request::CLOSE) {
                Exit::Accept
            } else {
                Exit::Abort
            });
        }
        self.place_cursor();
        if !self.suppress {
            self.refresh();
        }
        None
    }

    /// Flushes the screen
    pub fn refresh(&mut self) {
        if let Err(e) = self.screen.refresh() {
            warn!("failed to refresh the screen: {e}");
        }
    }

    /// Moves the terminal cursor to the query cursor
    pub fn place_cursor(&mut self) {
        self.renderer.place_cursor(&mut *self.screen, &self.input);
    }

    /// Repaints the list, prompt and info line
    pub fn print_all(&mut self) {
        self.print_list();
        self.print_prompt();
        self.print_info();
    }

    fn print_prompt(&mut self) {
        self.renderer.print_prompt(&mut *self.screen, &self.input);
    }

    fn print_info(&mut self) {
        let info = self.status_info();
        self.renderer
            .print_info(&mut *self.screen, &self.input, &info, self.status.reading, wall_clock());
    }

    fn print_list(&mut self) {
        self.renderer.print_list(&mut *self.screen, &mut self.item_list, self.multi);
    }

    fn status_info(&self) -> StatusInfo {
        StatusInfo {
            matched: self.item_list.len(),
            total: self.status.count,
            sort: self.sort_toggleable.then_some(self.sort),
            selected: if self.multi { self.item_list.selection.len() } else { 0 },
            progress: self.status.progress,
        }
    }

    //------------------------------------------------------------------------------
    // outcome

    /// What the session prints for `exit`
    pub fn output(&self, exit: Exit) -> TermOutput {
        if exit == Exit::Abort {
            return TermOutput {
                query: self.input.text(),
                is_abort: true,
                ..Default::default()
            };
        }
        let accept_key =
            (!self.bindings.expect.is_empty()).then(|| self.pressed.clone().unwrap_or_default());
        let selected = if self.item_list.selection.is_empty() {
            self.item_list.current().map(|item| item.text.clone()).into_iter().collect()
        } else {
            self.item_list.selection.texts_by_time()
        };
        TermOutput {
            query: self.input.text(),
            accept_key,
            selected,
            is_abort: false,
        }
    }

    /// Stores the query of an accepted session
    pub fn append_history(&mut self) {
        let query = self.input.text();
        if let Some(history) = self.history.as_mut()
            && let Err(e) = history.append(&query)
        {
            warn!("failed to write history: {e}");
        }
    }
}
