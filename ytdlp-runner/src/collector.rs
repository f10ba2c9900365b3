use std::io::{self, BufRead, BufReader, Read};

use crate::types::Source;

/// Drains `stream` line by line, calling `on_line` for each line before
/// appending it (without its terminator) to the returned buffer.
///
/// `\n`, `\r\n` and a bare `\r` all end a line, so carriage-return progress
/// updates reach the callback as they are printed. A read error ends the
/// stream; the text collected so far is still returned.
pub(crate) fn collect<R: Read>(stream: R, source: Source, on_line: &(dyn Fn(&str) + Sync)) -> String {
    let mut reader = LineReader::new(stream);
    let mut buffer = String::new();

    loop {
        match reader.next_line() {
            Ok(Some(line)) => {
                tracing::trace!(stream = source.as_str(), line = %line, "yt-dlp output");
                on_line(&line);
                buffer.push_str(&line);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(stream = source.as_str(), error = %e, "stopped reading yt-dlp output");
                break;
            }
        }
    }

    buffer
}

struct LineReader<R> {
    inner: BufReader<R>,
    raw: Vec<u8>,
    after_cr: bool
}

impl<R: Read> LineReader<R> {
    fn new(stream: R) -> Self {
        Self {
            inner: BufReader::new(stream),
            raw: Vec::new(),
            after_cr: false
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.raw.clear();

        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e)
            };

            if available.is_empty() {
                return Ok((!self.raw.is_empty()).then(|| self.decode()));
            }

            // `\r\n` split across two reads
            if self.after_cr {
                self.after_cr = false;
                if available[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }

            let (consumed, complete) = match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    self.after_cr = available[i] == b'\r';
                    self.raw.extend_from_slice(&available[..i]);
                    (i + 1, true)
                }
                None => {
                    self.raw.extend_from_slice(available);
                    (available.len(), false)
                }
            };

            self.inner.consume(consumed);

            if complete {
                return Ok(Some(self.decode()));
            }
        }
    }

    fn decode(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}
