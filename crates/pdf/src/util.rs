//! Generic utilities

use std::io::{self, Write};

/// A writer that counts how many bytes went through it
///
/// Source: <https://stackoverflow.com/questions/42187591/>
pub struct ByteCounter<W> {
    inner: W,
    count: usize,
    last: Option<u8>,
}

impl<W> ByteCounter<W>
where
    W: Write,
{
    /// Create a new byte counter
    pub fn new(inner: W) -> Self {
        ByteCounter {
            inner,
            count: 0,
            last: None,
        }
    }

    /// Return the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Get the number of bytes written
    pub fn bytes_written(&self) -> usize {
        self.count
    }

    /// Whether the output is empty or ends with a line feed
    pub fn at_line_start(&self) -> bool {
        matches!(self.last, None | Some(b'\n'))
    }
}

impl<W> Write for ByteCounter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        if let Ok(size) = res {
            self.count += size;
            if size > 0 {
                self.last = Some(buf[size - 1]);
            }
        }
        res
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Hands out consecutive object numbers
pub(crate) struct NextId {
    obj_id: u64,
}

impl NextId {
    pub(crate) fn new(start: u64) -> Self {
        Self { obj_id: start }
    }

    pub(crate) fn next(&mut self) -> u64 {
        let next = self.obj_id;
        self.obj_id += 1;
        next
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{ByteCounter, NextId};

    #[test]
    fn counts_bytes() {
        let mut counter = ByteCounter::new(Vec::new());
        write!(counter, "%PDF-1.4").unwrap();
        counter.write_all(&[b'\n']).unwrap();
        assert_eq!(counter.bytes_written(), 9);
        assert!(counter.at_line_start());
        write!(counter, "%").unwrap();
        assert!(!counter.at_line_start());
        assert_eq!(counter.into_inner(), b"%PDF-1.4\n%");
    }

    #[test]
    fn ids_are_consecutive() {
        let mut ids = NextId::new(1);
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
        assert_eq!(ids.next(), 3);
    }
}
