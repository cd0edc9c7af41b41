//! Query history.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Query history navigated with previous/next-history
pub trait History: Send {
    /// Stores an accepted query
    fn append(&mut self, line: &str) -> io::Result<()>;
    /// Remembers the edited query for the current slot, so that coming back to it restores the edit
    fn override_current(&mut self, line: &str);
    /// Moves one entry back and returns it
    fn previous(&mut self) -> String;
    /// Moves one entry forward and returns it
    fn next(&mut self) -> String;
}

/// History backed by a file with one query per line
#[derive(Debug, Clone)]
pub struct FileHistory {
    path: PathBuf,
    max_size: usize,
    // loaded lines followed by the empty slot of the query being typed
    lines: Vec<String>,
    cursor: usize,
    modified: HashMap<usize, String>,
}

impl FileHistory {
    /// Loads `path`, keeping at most `max_size` entries; a missing file is an empty history
    pub fn load(path: impl AsRef<Path>, max_size: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let excess = lines.len().saturating_sub(max_size);
        lines.drain(..excess);
        lines.push(String::new());
        debug!("loaded {} history entries from {}", lines.len() - 1, path.display());
        Ok(Self {
            path,
            max_size,
            cursor: lines.len() - 1,
            lines,
            modified: HashMap::new(),
        })
    }

    /// Stored entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.lines[..self.lines.len() - 1]
    }

    fn current(&self) -> String {
        self.modified
            .get(&self.cursor)
            .or_else(|| self.lines.get(self.cursor))
            .cloned()
            .unwrap_or_default()
    }
}

impl History for FileHistory {
    fn append(&mut self, line: &str) -> io::Result<()> {
        if line.is_empty() || self.entries().last().is_some_and(|last| last == line) {
            return Ok(());
        }
        let mut lines = self.entries().to_vec();
        lines.push(line.to_string());
        let excess = lines.len().saturating_sub(self.max_size);
        lines.drain(..excess);

        let mut file = BufWriter::new(File::create(&self.path)?);
        for l in &lines {
            writeln!(file, "{l}")?;
        }
        file.flush()?;

        lines.push(String::new());
        self.cursor = lines.len() - 1;
        self.lines = lines;
        self.modified.clear();
        Ok(())
    }

    fn override_current(&mut self, line: &str) {
        self.modified.insert(self.cursor, line.to_string());
    }

    fn previous(&mut self) -> String {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    fn next(&mut self) -> String {
        if self.cursor + 1 < self.lines.len() {
            self.cursor += 1;
        }
        self.current()
    }
}
