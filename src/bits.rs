//! Bit-level view over address bytes.

/// Read-only view of a byte slice as a sequence of bits, most significant
/// bit of the first byte first.
///
/// # Examples
/// ```
/// use subnets::BitView;
///
/// let bits = BitView::new(&[0b1010_0000, 0x01]);
/// assert_eq!(bits.get(0), 1);
/// assert_eq!(bits.get(1), 0);
/// assert_eq!(bits.get(2), 1);
/// assert_eq!(bits.get(15), 1);
/// assert_eq!(bits.len_bits(), 16);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BitView<'a> {
    bytes: &'a [u8],
}

impl<'a> BitView<'a> {
    /// Wrap a byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Return the bit at `index` as `0` or `1`.
    ///
    /// # Panics
    /// Panics if `index >= self.len_bits()`.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        ((self.bytes[index >> 3] >> (7 - (index & 7))) & 1) as usize
    }

    /// Number of bits available.
    pub fn len_bits(&self) -> usize {
        self.bytes.len() << 3
    }
}
