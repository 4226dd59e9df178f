//! Decoding of delimiter-framed log streams.

use std::io::{self, BufRead, BufReader, Read};

use crate::entry::{LogEntry, LOG_DELIMITER};
use crate::error::Result;

/// Iterator over the records of a log stream.
///
/// Records are split on [`LOG_DELIMITER`]. A trailing fragment without a
/// delimiter (a record still being written) is decoded as a final record.
pub struct LogEntryReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: Read> LogEntryReader<R> {
    /// Wraps a raw log stream.
    pub fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
            buf: Vec::new(),
            done: false,
        }
    }
}

/// Decodes every record in `reader`.
pub fn read_entries<R: Read>(reader: R) -> LogEntryReader<R> {
    LogEntryReader::new(reader)
}

impl<R: Read> Iterator for LogEntryReader<R> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();

        loop {
            match self.inner.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    let rest = self.buf.trim_ascii();
                    if rest.is_empty() {
                        return None;
                    }
                    return Some(LogEntry::decode(rest));
                }
                Ok(_) => {
                    if let Some(body) = self.buf.strip_suffix(LOG_DELIMITER.as_bytes()) {
                        return Some(LogEntry::decode(body));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
