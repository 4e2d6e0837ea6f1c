//! Auto-growing big-endian byte writer.

/// Default allocation size for a fresh [`Writer`].
const DEFAULT_ALLOC_SIZE: usize = 1024;

/// A binary buffer writer that grows automatically as needed.
///
/// Bytes between the flush cursor `x0` and the write cursor `x` are the
/// pending output. [`Writer::flush`] hands them out, [`Writer::discard`]
/// throws them away.
///
/// # Example
///
/// ```
/// use tablepack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_alloc_size(DEFAULT_ALLOC_SIZE)
    }

    /// Creates a writer whose buffer grows in steps of at least `alloc_size`.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(16);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn pending(&self) -> usize {
        self.x - self.x0
    }

    /// Ensures at least `capacity` bytes can be written at the cursor.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining >= capacity {
            return;
        }
        let pending = self.pending();
        let required = pending + capacity;
        let new_size = if required <= self.alloc_size {
            self.alloc_size
        } else {
            required * 2
        };
        let mut grown = vec![0u8; new_size];
        grown[..pending].copy_from_slice(&self.uint8[self.x0..self.x]);
        self.uint8 = grown;
        self.x0 = 0;
        self.x = pending;
    }

    /// Moves the flush cursor up to the write cursor.
    pub fn reset(&mut self) {
        self.x0 = self.x;
    }

    /// Drops everything written since the last flush.
    pub fn discard(&mut self) {
        self.x = self.x0;
    }

    /// Returns the pending bytes and advances the flush cursor.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.ensure_capacity(N);
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put([val]);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.put(val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.put(val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian u16.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.ensure_capacity(3);
        self.u8(marker);
        self.u16(val);
    }

    /// Writes a marker byte followed by a big-endian u32.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.ensure_capacity(5);
        self.u8(marker);
        self.u32(val);
    }

    /// Writes a marker byte followed by a big-endian u64.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.ensure_capacity(9);
        self.u8(marker);
        self.u64(val);
    }

    /// Writes a marker byte followed by a big-endian f64.
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.ensure_capacity(9);
        self.u8(marker);
        self.f64(val);
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }
}
