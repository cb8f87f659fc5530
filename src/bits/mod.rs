//! Bit-level packing helpers shared by the encoder and decoder.
//!
//! Bit streams are kept packed in bytes, most significant bit first. A stream is
//! addressed by absolute bit offset so that independent pixel rows can be
//! processed in parallel without sharing a cursor.

use byteorder::{BigEndian, ByteOrder};

use crate::config;

/// Read `count` bits (at most 8) starting at `bit_offset`, MSB first.
///
/// Offsets past the end of `data` read as zero, which is how the encoder
/// realises zero padding up to the full image capacity.
pub fn bits_at(data: &[u8], bit_offset: u64, count: u8) -> u8 {
    let mut value = 0u8;
    for i in 0..count as u64 {
        let pos = bit_offset + i;
        let byte_idx = (pos / 8) as usize;
        let bit = match data.get(byte_idx) {
            Some(byte) => (byte >> (7 - (pos % 8))) & 1,
            None => 0,
        };
        value = (value << 1) | bit;
    }
    value
}

/// Accumulates fixed-width bit groups into bytes, MSB first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u16,
    acc_bits: u8,
}

impl BitWriter {
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits / 8),
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Append the low `count` bits of `value` (at most 8).
    pub fn push(&mut self, value: u8, count: u8) {
        let mask = low_bits_mask(count) as u16;
        self.acc = (self.acc << count) | (value as u16 & mask);
        self.acc_bits += count;
        if self.acc_bits >= 8 {
            self.acc_bits -= 8;
            self.bytes.push((self.acc >> self.acc_bits) as u8);
            self.acc &= (1u16 << self.acc_bits) - 1;
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.acc_bits as usize
    }

    /// Complete bytes written so far. A trailing partial byte is dropped.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Mask selecting the low `count` bits of a channel value.
pub fn low_bits_mask(count: u8) -> u8 {
    if count >= 8 {
        0xFF
    } else {
        (1u8 << count) - 1
    }
}

/// Serialize a payload length as the 32-bit big-endian stream header.
pub fn write_length_header(len: u32) -> [u8; 4] {
    let mut header = [0u8; 4];
    BigEndian::write_u32(&mut header, len);
    header
}

/// Parse the 32-bit stream header. Missing trailing bytes read as zero.
pub fn read_length_header(data: &[u8]) -> u32 {
    let mut header = [0u8; config::HEADER_BITS / 8];
    let n = data.len().min(header.len());
    header[..n].copy_from_slice(&data[..n]);
    BigEndian::read_u32(&header)
}

/// Build the bit stream the encoder embeds: optional length header, then payload.
pub fn build_stream(payload: &[u8], include_header: bool) -> Vec<u8> {
    let mut stream = Vec::with_capacity(payload.len() + 4);
    if include_header {
        stream.extend_from_slice(&write_length_header(payload.len() as u32));
    }
    stream.extend_from_slice(payload);
    stream
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_at_msb_first() {
        let data = [0b1011_0010, 0b0100_0001];
        assert_eq!(bits_at(&data, 0, 1), 1);
        assert_eq!(bits_at(&data, 1, 1), 0);
        assert_eq!(bits_at(&data, 0, 4), 0b1011);
        assert_eq!(bits_at(&data, 6, 4), 0b1001);
        assert_eq!(bits_at(&data, 0, 8), 0b1011_0010);
    }

    #[test]
    fn test_bits_at_past_end_is_zero_padding() {
        let data = [0xFF];
        assert_eq!(bits_at(&data, 6, 4), 0b1100);
        assert_eq!(bits_at(&data, 64, 8), 0);
    }

    #[test]
    fn test_writer_packs_uneven_groups() {
        let mut w = BitWriter::default();
        // 101 | 10010 | 010 | 00001 -> 0b1011_0010, 0b0100_0001
        w.push(0b101, 3);
        w.push(0b10010, 5);
        w.push(0b010, 3);
        w.push(0b00001, 5);
        assert_eq!(w.bit_len(), 16);
        assert_eq!(w.into_bytes(), vec![0b1011_0010, 0b0100_0001]);
    }

    #[test]
    fn test_writer_ignores_high_bits_and_drops_partial_byte() {
        let mut w = BitWriter::default();
        w.push(0xFF, 1);
        w.push(0x00, 7);
        w.push(0b11, 2);
        assert_eq!(w.bit_len(), 10);
        assert_eq!(w.into_bytes(), vec![0b1000_0000]);
    }

    #[test]
    fn test_reader_writer_agree_on_every_group_width() {
        let data: Vec<u8> = (0..=255u8).collect();
        for width in 1..=8u8 {
            let mut w = BitWriter::default();
            let total = data.len() as u64 * 8;
            let mut offset = 0;
            while offset < total {
                w.push(bits_at(&data, offset, width), width);
                offset += width as u64;
            }
            let mut out = w.into_bytes();
            out.truncate(data.len());
            assert_eq!(out, data, "width {width}");
        }
    }

    #[test]
    fn test_length_header_is_big_endian() {
        assert_eq!(write_length_header(78), [0, 0, 0, 78]);
        assert_eq!(write_length_header(0x0102_0304), [1, 2, 3, 4]);
        assert_eq!(read_length_header(&[0, 0, 1, 0, 0xAA]), 256);
        assert_eq!(read_length_header(&[0x01]), 0x0100_0000);
    }

    #[test]
    fn test_mask() {
        assert_eq!(low_bits_mask(1), 0b1);
        assert_eq!(low_bits_mask(3), 0b111);
        assert_eq!(low_bits_mask(8), 0xFF);
    }
}
