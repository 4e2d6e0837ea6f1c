//! Bounds-checked big-endian reader over a borrowed byte slice.

use crate::BufferError;

/// A binary buffer reader with cursor tracking.
///
/// Every read checks the remaining length first and returns
/// [`BufferError::EndOfBuffer`] instead of panicking, so truncated input
/// can never take the process down.
///
/// # Example
///
/// ```
/// use tablepack_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.u16(), Ok(0x0203));
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Returns the byte under the cursor without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.take::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.take().map(i8::from_be_bytes)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.take().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.take().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.take().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.take().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.take().map(u64::from_be_bytes)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.take().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.take().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.take().map(f64::from_be_bytes)
    }

    /// Returns the next `size` bytes without copying and advances past them.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u16(), Ok(0x0203));
        assert_eq!(reader.u32(), Ok(0x04050607));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xfd];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i8(), Ok(-1));
        assert_eq!(reader.i16(), Ok(-2));
        assert_eq!(reader.i32(), Ok(-3));
    }

    #[test]
    fn test_64_bit_reads() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-9_999_999_999i64).to_be_bytes());
        data.extend_from_slice(&u64::MAX.to_be_bytes());
        data.extend_from_slice(&1.5f64.to_be_bytes());
        data.extend_from_slice(&0.25f32.to_be_bytes());
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i64(), Ok(-9_999_999_999));
        assert_eq!(reader.u64(), Ok(u64::MAX));
        assert_eq!(reader.f64(), Ok(1.5));
        assert_eq!(reader.f32(), Ok(0.25));
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32(), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.x, 0);
        assert_eq!(reader.u16(), Ok(0x0102));
    }

    #[test]
    fn test_buf_is_zero_copy_slice() {
        let data = b"abcdef";
        let mut reader = Reader::new(data);
        reader.u8().unwrap();
        let s = reader.buf(3).unwrap();
        assert_eq!(s, b"bcd");
        assert_eq!(reader.buf(3), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.buf(2), Ok(&b"ef"[..]));
    }

    #[test]
    fn test_peek() {
        let data = [0x7f];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.peek(), Ok(0x7f));
        assert_eq!(reader.x, 0);
        reader.u8().unwrap();
        assert_eq!(reader.peek(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_empty_input() {
        let mut reader = Reader::new(&[]);
        assert_eq!(reader.u8(), Err(BufferError::EndOfBuffer));
        assert_eq!(reader.buf(0), Ok(&[][..]));
    }
}
