use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Lines of a UTF-8 text source, ended by `\n`, `\r\n` or a lone `\r`.
/// Terminators are stripped. Iteration stops after the first error.
pub struct LogLines<R> {
    reader: R,
    pending: VecDeque<String>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            buf: Vec::new(),
            done: false,
        }
    }

    /// Read up to the next `\n` and queue every line it contains.
    fn fill(&mut self) -> io::Result<()> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            self.done = true;
            return Ok(());
        }

        let mut chunk = self.buf.as_slice();
        if let Some(rest) = chunk.strip_suffix(b"\n") {
            chunk = rest;
        }
        // a trailing `\r` ends the last line instead of opening a new one
        let trailing_cr = chunk.strip_suffix(b"\r");
        if let Some(rest) = trailing_cr {
            chunk = rest;
        }

        let text = std::str::from_utf8(chunk)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pending.extend(text.split('\r').map(str::to_string));
        Ok(())
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            if self.done {
                return None;
            }
            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
        self.pending.pop_front().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<String> {
        LogLines::new(input).collect::<io::Result<_>>().unwrap()
    }

    #[test]
    fn all_terminators_end_a_line() {
        assert_eq!(collect(b"a\nb\r\nc\rd"), ["a", "b", "c", "d"]);
        assert_eq!(collect(b"a\r\r\nb\n"), ["a", "", "b"]);
    }

    #[test]
    fn empty_lines_are_kept() {
        assert_eq!(collect(b"\n\r\n\r"), ["", "", ""]);
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn final_line_without_terminator() {
        assert_eq!(collect(b"first\nlast"), ["first", "last"]);
        assert_eq!(collect(b"only\r"), ["only"]);
    }

    #[test]
    fn invalid_utf8_stops_iteration() {
        let mut lines = LogLines::new(&b"ok\n\xff\nnever\n"[..]);
        assert_eq!(lines.next().unwrap().unwrap(), "ok");
        let err = lines.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(lines.next().is_none());
    }
}
