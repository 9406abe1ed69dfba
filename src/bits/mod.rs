pub mod counter;
pub mod writer;

pub use counter::BitCounter;
pub use writer::BitWriter;

use crate::error::Result;

/// LSB-first destination for DEFLATE bits
///
/// Implemented both by [`BitWriter`], which produces bytes, and by
/// [`BitCounter`], which only counts. All block formatting goes through this
/// trait so a dry run costs exactly what a real write emits.
pub trait BitSink {
    /// Write a single bit
    fn write_bit(&mut self, bit: bool);

    /// Write the low `n` bits (1-32) of `value`, least-significant first
    fn write_bits(&mut self, value: u32, n: u8) -> Result<()>;

    /// Pad with zero bits to the next byte boundary
    fn align_to_byte(&mut self);

    /// True when no bits are pending in the current byte
    fn is_aligned(&self) -> bool;

    /// Write a raw byte; fails unless byte-aligned
    fn write_aligned_byte(&mut self, byte: u8) -> Result<()>;

    /// Write a 16-bit value in little-endian; fails unless byte-aligned
    fn write_aligned_u16_le(&mut self, value: u16) -> Result<()> {
        self.write_aligned_byte(value as u8)?;
        self.write_aligned_byte((value >> 8) as u8)
    }

    /// Total bits written so far, including padding
    fn bits_written(&self) -> u64;
}
