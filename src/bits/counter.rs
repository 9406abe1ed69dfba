use super::BitSink;
use crate::error::{Error, Result};

/// Bit sink that only counts what would have been written
#[derive(Clone, Debug, Default)]
pub struct BitCounter {
    bits: u64,
}

impl BitCounter {
    pub fn new() -> Self {
        Self { bits: 0 }
    }
}

impl BitSink for BitCounter {
    #[inline]
    fn write_bit(&mut self, _bit: bool) {
        self.bits += 1;
    }

    #[inline]
    fn write_bits(&mut self, _value: u32, n: u8) -> Result<()> {
        if !(1..=32).contains(&n) {
            return Err(Error::InvalidBitCount(n));
        }
        self.bits += n as u64;
        Ok(())
    }

    fn align_to_byte(&mut self) {
        self.bits = (self.bits + 7) & !7;
    }

    fn is_aligned(&self) -> bool {
        self.bits % 8 == 0
    }

    fn write_aligned_byte(&mut self, _byte: u8) -> Result<()> {
        if !self.is_aligned() {
            return Err(Error::Unaligned { pending_bits: (self.bits % 8) as u8 });
        }
        self.bits += 8;
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitWriter;

    #[test]
    fn test_counts_bits() {
        let mut counter = BitCounter::new();
        counter.write_bit(true);
        counter.write_bits(0x3FF, 10).unwrap();
        assert_eq!(counter.bits_written(), 11);
        counter.align_to_byte();
        assert_eq!(counter.bits_written(), 16);
        counter.write_aligned_u16_le(7).unwrap();
        assert_eq!(counter.bits_written(), 32);
    }

    #[test]
    fn test_agrees_with_writer() {
        let mut counter = BitCounter::new();
        let mut writer = BitWriter::new();
        for (value, n) in [(1u32, 1u8), (0x1F, 5), (0, 7), (0xFFFF_FFFF, 32), (3, 2)] {
            counter.write_bits(value, n).unwrap();
            writer.write_bits(value, n).unwrap();
            assert_eq!(counter.bits_written(), writer.bits_written());
            assert_eq!(counter.is_aligned(), writer.is_aligned());
        }
        counter.align_to_byte();
        writer.align_to_byte();
        assert_eq!(counter.bits_written(), writer.bits_written());
    }

    #[test]
    fn test_alignment_enforced() {
        let mut counter = BitCounter::new();
        counter.write_bits(1, 3).unwrap();
        assert!(matches!(counter.write_aligned_byte(0), Err(Error::Unaligned { pending_bits: 3 })));
        assert!(matches!(counter.write_bits(0, 0), Err(Error::InvalidBitCount(0))));
    }
}
