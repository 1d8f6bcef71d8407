use std::{
    io::BufRead,
    sync::mpsc::{Receiver, SyncSender, TryRecvError, sync_channel},
    thread,
};

/// Result of one non-blocking poll of the line channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinePoll {
    /// A completed line is ready.
    Line(String),
    /// Nothing yet; the reader is still alive.
    Idle,
    /// The input source is exhausted and every line has been drained.
    Eof,
}

/// Background line capture. A dedicated thread blocks on stdin and places
/// each completed line on a capacity-1 channel; the frame loop polls between
/// ticks, so command processing never interleaves with traversal. The thread
/// blocks rather than reads ahead while a line is waiting, and ends at EOF.
pub struct LineReader {
    rx: Receiver<String>,
}

impl LineReader {
    /// Spawns the reader thread over stdin.
    pub fn spawn() -> Self {
        Self::from_reader(|| std::io::stdin().lock().lines())
    }

    fn from_reader<F, I>(make_lines: F) -> Self
    where
        F: FnOnce() -> I + Send + 'static,
        I: Iterator<Item = std::io::Result<String>> + 'static,
    {
        let (tx, rx): (SyncSender<String>, Receiver<String>) = sync_channel(1);
        thread::spawn(move || {
            for line in make_lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    /// Never blocks; one channel read decides between line, idle, and eof.
    pub fn poll(&self) -> LinePoll {
        match self.rx.try_recv() {
            Ok(line) => LinePoll::Line(line),
            Err(TryRecvError::Empty) => LinePoll::Idle,
            Err(TryRecvError::Disconnected) => LinePoll::Eof,
        }
    }
}
