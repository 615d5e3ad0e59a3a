use crate::error::{Error, Result};
use crate::stream::ByteSource;


/// Cursor over a borrowed byte buffer.
#[derive(Clone)]
pub struct Reader<'buf, T> {
    pub buffer: &'buf [T],
    pub cursor: usize,
}

impl<'rdr, T> Reader<'rdr, T> {
    pub fn new(buffer: &'rdr [T]) -> Reader<'rdr, T> {
        Reader { buffer: buffer, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn rest(&self) -> &'rdr [T] {
        &self.buffer[self.cursor..]
    }


    pub fn empty(&self) -> bool {
        !self.has_some()
    }

    pub fn has_some(&self) -> bool {
        self.cursor < self.buffer.len()
    }

    pub fn peek(&self, offset: usize) -> Option<&'rdr T> {
        self.buffer.get(self.cursor.checked_add(offset)?)
    }

    pub fn next(&mut self) -> Option<&'rdr T> {
        self.peek(0).map(|result| {
            self.cursor += 1;
            result
        })
    }


    pub fn has_n(&self, n: usize) -> bool {
        n <= self.remaining()
    }

    pub fn peek_n(&self, n: usize) -> Option<&'rdr [T]> {
        if self.has_n(n) {
            return Some(&self.buffer[self.cursor .. self.cursor + n]);
        }
        None
    }

    pub fn next_n(&mut self, n: usize) -> Option<&'rdr [T]> {
        self.peek_n(n).map(|result| {
            self.cursor += n;
            result
        })
    }
}


impl<'rdr> Reader<'rdr, u8> {
    fn truncated(&self, needed: usize) -> Error {
        Error::Truncated { needed, available: self.remaining() }
    }
}

impl<'rdr> ByteSource for Reader<'rdr, u8> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let bytes = self.next_n(buf.len()).ok_or_else(|| self.truncated(buf.len()))?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.next_n(len).ok_or_else(|| self.truncated(len))?;
        Ok(bytes.to_vec())
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.next_n(len).ok_or_else(|| self.truncated(len))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_the_cursor() {
        let bytes = [0xFFu8, 0x00, 0x7F, 0xFF, 0xFF, 0xFF, 0x80];
        let mut reader = Reader::new(&bytes[..]);
        assert_eq!(reader.read_array::<2>().map(i16::from_be_bytes).unwrap(), -256);
        assert_eq!(reader.read_array::<4>().map(i32::from_be_bytes).unwrap(), i32::MAX);
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_array::<2>().unwrap_err().is_truncated());
        assert_eq!(reader.next(), Some(&0x80));
        assert!(reader.empty());
    }

    #[test]
    fn short_read_reports_what_was_left() {
        let bytes = [1u8, 2, 3];
        let mut reader = Reader::new(&bytes[..]);
        reader.next();
        match reader.read_vec(5) {
            Err(Error::Truncated { needed: 5, available: 2 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        // a failed read leaves the cursor where it was
        assert_eq!(reader.rest(), &[2, 3]);
    }

    #[test]
    fn huge_lengths_do_not_overflow() {
        let bytes = [0u8; 4];
        let mut reader = Reader::new(&bytes[..]);
        reader.next();
        assert!(reader.peek_n(usize::MAX).is_none());
        assert!(reader.peek(usize::MAX).is_none());
    }
}
