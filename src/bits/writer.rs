use super::BitSink;
use crate::error::{Error, Result};

/// Bit-level writer for DEFLATE output
///
/// Writes bits LSB-first to match DEFLATE format.
pub struct BitWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { output: Vec::with_capacity(65536), current_byte: 0, bits_in_byte: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0 }
    }

    /// Finish and return the output bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Get current output length in bytes (including partial byte)
    pub fn len(&self) -> usize {
        self.output.len() + if self.bits_in_byte > 0 { 1 } else { 0 }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.bits_in_byte == 0
    }

    #[inline]
    fn push_bits(&mut self, value: u32, n: u8) {
        let mut val = value;
        let mut remaining = n;

        while remaining > 0 {
            let space = 8 - self.bits_in_byte;
            let to_write = remaining.min(space);

            let mask = (1u32 << to_write) - 1;
            self.current_byte |= ((val & mask) as u8) << self.bits_in_byte;

            val >>= to_write;
            self.bits_in_byte += to_write;
            remaining -= to_write;

            if self.bits_in_byte == 8 {
                self.output.push(self.current_byte);
                self.current_byte = 0;
                self.bits_in_byte = 0;
            }
        }
    }
}

impl BitSink for BitWriter {
    #[inline]
    fn write_bit(&mut self, bit: bool) {
        self.push_bits(bit as u32, 1);
    }

    #[inline]
    fn write_bits(&mut self, value: u32, n: u8) -> Result<()> {
        if !(1..=32).contains(&n) {
            return Err(Error::InvalidBitCount(n));
        }
        self.push_bits(value, n);
        Ok(())
    }

    fn align_to_byte(&mut self) {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    fn is_aligned(&self) -> bool {
        self.bits_in_byte == 0
    }

    fn write_aligned_byte(&mut self, byte: u8) -> Result<()> {
        if self.bits_in_byte != 0 {
            return Err(Error::Unaligned { pending_bits: self.bits_in_byte });
        }
        self.output.push(byte);
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.output.len() as u64 * 8 + self.bits_in_byte as u64
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b011, 3).unwrap(); // bits 0-2
        writer.write_bits(0b11010, 5).unwrap(); // bits 3-7
        let output = writer.finish();
        assert_eq!(output, vec![0xD3]); // 11010_011 = 0xD3
    }

    #[test]
    fn test_single_bits_lsb_first() {
        let mut writer = BitWriter::new();
        for i in 0..8 {
            writer.write_bit(i % 2 == 0);
        }
        assert_eq!(writer.finish(), vec![0x55]);
    }

    #[test]
    fn test_write_cross_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xABCD, 16).unwrap();
        assert_eq!(writer.finish(), vec![0xCD, 0xAB]);
    }

    #[test]
    fn test_write_32_bits() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xDEADBEEF, 32).unwrap();
        assert_eq!(writer.finish(), vec![0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new();
        assert!(matches!(writer.write_bits(1, 0), Err(Error::InvalidBitCount(0))));
        assert!(matches!(writer.write_bits(1, 33), Err(Error::InvalidBitCount(33))));
        assert!(writer.is_empty());
    }

    #[test]
    fn test_partial_then_align() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b10111, 5).unwrap();
        assert!(!writer.is_aligned());
        writer.align_to_byte();
        assert!(writer.is_aligned());
        assert_eq!(writer.finish(), vec![0x17]);
    }

    #[test]
    fn test_aligned_write_requires_alignment() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        assert!(matches!(writer.write_aligned_byte(0xAA), Err(Error::Unaligned { pending_bits: 3 })));
        writer.align_to_byte();
        writer.write_aligned_byte(0xAA).unwrap();
        assert_eq!(writer.finish(), vec![0x05, 0xAA]);
    }

    #[test]
    fn test_write_u16_le() {
        let mut writer = BitWriter::new();
        writer.write_aligned_u16_le(0x1234).unwrap();
        assert_eq!(writer.finish(), vec![0x34, 0x12]);
    }

    #[test]
    fn test_bits_written() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 13).unwrap();
        assert_eq!(writer.bits_written(), 13);
        assert_eq!(writer.len(), 2);
    }
}
