//! Reads items from stdin or a command and feeds them to the [`Matcher`](crate::matcher::Matcher).

use std::io::{self, BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use kanal::Sender;

use crate::matcher::MatcherEvent;

const ITEMS_BUFFER_SIZE: usize = 1024;
const SEND_TIMEOUT: Duration = Duration::from_millis(50);

/// Command listing items when stdin is a terminal
pub const DEFAULT_COMMAND: &str = "find .";

/// `$SKIM_TERM_DEFAULT_COMMAND`, or [`DEFAULT_COMMAND`] when unset or empty
pub fn default_command() -> String {
    match std::env::var("SKIM_TERM_DEFAULT_COMMAND") {
        Ok(cmd) if !cmd.is_empty() => cmd,
        _ => DEFAULT_COMMAND.to_string(),
    }
}

/// Line reader thread
pub struct Reader {
    thread: JoinHandle<()>,
    child: Option<Child>,
}

impl Reader {
    /// Reads newline-separated items from `source` until it ends
    pub fn spawn(source: impl BufRead + Send + 'static, tx: Sender<MatcherEvent>) -> Self {
        let thread = thread::spawn(move || {
            debug!("reader thread start");
            read_lines(source, &tx);
            if tx.send(MatcherEvent::ReaderDone).is_err() {
                debug!("matcher is gone before the end of input");
            }
            debug!("reader thread stop");
        });
        Self { thread, child: None }
    }

    /// Reads the output of `sh -c cmd`
    pub fn from_command(cmd: &str, tx: Sender<MatcherEvent>) -> io::Result<Self> {
        debug!("reading from `{cmd}`");
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("command has no stdout"))?;
        let mut reader = Self::spawn(BufReader::new(stdout), tx);
        reader.child = Some(child);
        Ok(reader)
    }

    /// Stops the command, if any
    pub fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    /// Waits for the input to be exhausted
    pub fn join(self) {
        let Self { thread, child } = self;
        if thread.join().is_err() {
            warn!("reader thread panicked");
        }
        if let Some(mut child) = child {
            let _ = child.wait();
        }
    }
}

fn read_lines(mut source: impl BufRead, tx: &Sender<MatcherEvent>) {
    let mut buffer = Vec::new();
    let mut items_to_send = Vec::with_capacity(ITEMS_BUFFER_SIZE);
    let mut last_send_time = Instant::now();

    loop {
        buffer.clear();
        match source.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {
                if buffer.ends_with(b"\r\n") {
                    buffer.truncate(buffer.len() - 2);
                } else if buffer.ends_with(b"\n") {
                    buffer.pop();
                }
                items_to_send.push(String::from_utf8_lossy(&buffer).into_owned());
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("failed to read items: {e}");
                break;
            }
        }

        if items_to_send.len() == ITEMS_BUFFER_SIZE || last_send_time.elapsed() >= SEND_TIMEOUT {
            let batch = std::mem::replace(&mut items_to_send, Vec::with_capacity(ITEMS_BUFFER_SIZE));
            if tx.send(MatcherEvent::Items(batch)).is_err() {
                return;
            }
            last_send_time = Instant::now();
        }
    }

    if !items_to_send.is_empty() {
        let _ = tx.send(MatcherEvent::Items(items_to_send));
    }
}
