use std::io::{self, Write};

/// Output sink that remembers the line currently being written.
///
/// The trailing line holds the bytes written since the last completed line,
/// including that line's `\n` once it is complete. A trailing line of exactly
/// `"\n"` means the output currently ends in a blank line.
#[derive(Debug)]
pub struct LineTracker<W> {
    inner: W,
    trailing_line: Vec<u8>,
    line_complete: bool,
}

impl<W: Write> LineTracker<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            trailing_line: Vec::new(),
            line_complete: false,
        }
    }

    pub fn trailing_line(&self) -> &[u8] {
        &self.trailing_line
    }

    /// True when the last thing written was an empty line.
    pub fn at_blank_line(&self) -> bool {
        self.trailing_line == b"\n"
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn track(&mut self, written: &[u8]) {
        for line in written.split_inclusive(|&b| b == b'\n') {
            if self.line_complete {
                self.trailing_line.clear();
            }
            self.trailing_line.extend_from_slice(line);
            self.line_complete = line.ends_with(b"\n");
        }
    }
}

impl<W: Write> Write for LineTracker<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.track(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
