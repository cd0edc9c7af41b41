//! Search backend interface and the reference matcher.
//!
//! The terminal loop only needs a [`SearchBackend`] to tell about query and
//! sort changes; results come back through a [`ResultSink`]. [`Matcher`] is a
//! plain case-insensitive subsequence matcher running on its own thread.
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use kanal::{Receiver, Sender};

use crate::item::{Item, MatchedItems, ResultView};

/// Items scanned between two progress reports
const PROGRESS_CHUNK: usize = 10_000;

/// What the terminal loop needs from a search backend
pub trait SearchBackend: Send + Sync {
    /// Restarts the search for `query`; called after every query or sort change
    fn restart_search(&self, query: &str, sort: bool);
}

/// Where a search backend reports to
pub trait ResultSink: Send + 'static {
    /// Number of items read so far, `is_final` once reading is over
    fn update_count(&self, count: usize, is_final: bool);
    /// Progress of the running search, in `[0, 1]`
    fn update_progress(&self, fraction: f32);
    /// New ranked results
    fn update_list(&self, results: Arc<dyn ResultView>);
}

/// Messages driving the [`Matcher`] thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherEvent {
    /// Search again with this query
    Restart {
        /// Query text
        query: String,
        /// Sort the results
        sort: bool,
    },
    /// More items to search
    Items(Vec<String>),
    /// No more items will come
    ReaderDone,
}

//==============================================================================
/// Reference search backend
pub struct Matcher {
    tx: Sender<MatcherEvent>,
}

impl Matcher {
    /// Starts the matcher thread, reporting to `sink`
    pub fn spawn(sink: impl ResultSink, query: &str, sort: bool) -> (Self, JoinHandle<()>) {
        let (tx, rx) = kanal::unbounded();
        let query = query.to_string();
        let thread = thread::spawn(move || {
            debug!("matcher thread start");
            run(rx, sink, query, sort);
            debug!("matcher thread stop");
        });
        (Self { tx }, thread)
    }

    /// Sender for item batches, see [`crate::reader::Reader`]
    pub fn sender(&self) -> Sender<MatcherEvent> {
        self.tx.clone()
    }
}

impl SearchBackend for Matcher {
    fn restart_search(&self, query: &str, sort: bool) {
        let event = MatcherEvent::Restart {
            query: query.to_string(),
            sort,
        };
        if self.tx.send(event).is_err() {
            warn!("matcher thread is gone");
        }
    }
}

fn run(rx: Receiver<MatcherEvent>, sink: impl ResultSink, mut query: String, mut sort: bool) {
    let mut pool: Vec<String> = Vec::new();
    let mut reader_done = false;

    while let Ok(first) = rx.recv() {
        let mut events = vec![first];
        while let Ok(Some(event)) = rx.try_recv() {
            events.push(event);
        }
        for event in events {
            match event {
                MatcherEvent::Restart { query: q, sort: s } => {
                    query = q;
                    sort = s;
                }
                MatcherEvent::Items(items) => pool.extend(items),
                MatcherEvent::ReaderDone => reader_done = true,
            }
        }

        trace!("matcher start, query: {query:?}, total: {}", pool.len());
        let matched = search(&pool, &query, sort, |fraction| sink.update_progress(fraction));
        trace!("matcher stop, total matched: {}", matched.len());
        sink.update_list(MatchedItems::new(matched).into_view());
        sink.update_count(pool.len(), reader_done);
    }
}

/// Matches `pool` against `query`, ranking by match span, then length, then position
pub fn search(pool: &[String], query: &str, sort: bool, mut progress: impl FnMut(f32)) -> Vec<Item> {
    let needle: Vec<char> = query.chars().filter(|c| !c.is_whitespace()).map(fold_case).collect();
    let mut ranked: Vec<(usize, usize, Item)> = Vec::new();

    for (chunk_idx, chunk) in pool.chunks(PROGRESS_CHUNK).enumerate() {
        if pool.len() > PROGRESS_CHUNK {
            progress((chunk_idx * PROGRESS_CHUNK) as f32 / pool.len() as f32);
        }
        for (i, text) in chunk.iter().enumerate() {
            let id = chunk_idx * PROGRESS_CHUNK + i;
            if let Some(offsets) = match_offsets(text, &needle) {
                let span = match (offsets.first(), offsets.last()) {
                    (Some(&(b, _)), Some(&(_, e))) => e - b,
                    _ => 0,
                };
                let len = text.chars().count();
                ranked.push((span, len, Item::new(id, text.as_str()).with_offsets(offsets)));
            }
        }
    }

    if sort && !needle.is_empty() {
        // stable, so equal ranks keep input order
        ranked.sort_by_key(|(span, len, _)| (*span, *len));
    }
    ranked.into_iter().map(|(_, _, item)| item).collect()
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Leftmost subsequence match of `needle` in `text`, as merged char spans
fn match_offsets(text: &str, needle: &[char]) -> Option<Vec<(usize, usize)>> {
    let mut offsets: Vec<(usize, usize)> = Vec::new();
    let mut remaining = needle.iter().peekable();
    for (idx, c) in text.chars().enumerate() {
        let Some(&&wanted) = remaining.peek() else {
            break;
        };
        if fold_case(c) == wanted {
            remaining.next();
            match offsets.last_mut() {
                Some(last) if last.1 == idx => last.1 = idx + 1,
                _ => offsets.push((idx, idx + 1)),
            }
        }
    }
    remaining.peek().is_none().then_some(offsets)
}
