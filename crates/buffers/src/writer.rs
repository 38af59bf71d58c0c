//! Binary buffer writer with auto-growing capacity.

/// A binary buffer writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use tagwire_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0x03, 0x02]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with default allocation size (4KB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Drops everything written since the last flush.
    pub fn reset(&mut self) {
        self.x = self.x0;
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.ensure_capacity(N);
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put([val]);
    }

    /// Writes a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.put(val.to_le_bytes());
    }

    /// Writes a boolean as a single `0`/`1` byte.
    #[inline]
    pub fn bool(&mut self, val: bool) {
        self.put([val as u8]);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.put(val.to_le_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.put(val.to_le_bytes());
    }

    /// Overwrites a previously written `u32` at offset `pos`, counted from
    /// the last flush position (the value [`Writer::len`] had before it was
    /// written). Growing the buffer does not invalidate such offsets.
    ///
    /// Used to back-patch a length prefix once the framed content is written.
    pub fn u32_at(&mut self, pos: usize, val: u32) {
        let at = self.x0 + pos;
        self.uint8[at..at + 4].copy_from_slice(&val.to_le_bytes());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }
}
