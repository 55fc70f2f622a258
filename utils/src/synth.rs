//! Layout-driven frame synthesis.
//!
//! Builds byte-exact frames from the same layout catalog the decoder reads,
//! so fixtures and sample files cannot drift from the wire contract. This is
//! tooling for tests and the sample generator, not a protocol encoder:
//! checksums are whatever the caller sets, field names are asserted.

use crate::bits;
use crate::layout::{FieldKind, HeaderLayout, HeaderLength};
use crate::wire;

pub struct FrameBuilder {
    bytes: Vec<u8>,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append a zero-filled region for a fixed-length header and return its
    /// start offset.
    ///
    /// # Panics
    ///
    /// Panics when called with a variable-length layout; those need
    /// `append_sized` with an explicit byte length.
    pub fn append(&mut self, layout: &HeaderLayout) -> usize {
        match layout.length {
            HeaderLength::Fixed(len) => self.append_region(len),
            HeaderLength::Variable { .. } => {
                panic!("{} header is variable length, use append_sized", layout.protocol)
            }
        }
    }

    /// Append a zero-filled region of `len` bytes for a variable-length
    /// header. The caller still sets the length nibble field itself.
    pub fn append_sized(&mut self, _layout: &HeaderLayout, len: usize) -> usize {
        self.append_region(len)
    }

    fn append_region(&mut self, len: usize) -> usize {
        let start = self.bytes.len();
        self.bytes.resize(start + len, 0);
        start
    }

    /// Write an integer field of the header starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics on unknown field names or on `Bytes` fields (use `set_bytes`);
    /// misuse here is a bug in the fixture, not runtime input.
    pub fn set(&mut self, layout: &HeaderLayout, start: usize, name: &str, value: u64) -> &mut Self {
        let field = match layout.field(name) {
            Some(f) => f,
            None => panic!("{} header has no field named {:?}", layout.protocol, name),
        };
        let at = start + field.byte;
        match field.kind {
            FieldKind::U8 => self.bytes[at] = value as u8,
            FieldKind::U16 => {
                self.bytes[at..at + 2].copy_from_slice(&wire::to_wire_u16(value as u16))
            }
            FieldKind::U32 => {
                self.bytes[at..at + 4].copy_from_slice(&wire::to_wire_u32(value as u32))
            }
            FieldKind::Bits { bit_offset, width } => {
                self.bytes[at] =
                    bits::set(self.bytes[at] as u32, bit_offset, width, value as u32) as u8;
            }
            FieldKind::WideBits { bit_offset, width } => {
                let host = wire::to_host_u16([self.bytes[at], self.bytes[at + 1]]);
                let host = bits::set(host as u32, bit_offset, width, value as u32) as u16;
                self.bytes[at..at + 2].copy_from_slice(&wire::to_wire_u16(host));
            }
            FieldKind::Bytes(len) => {
                panic!("field {:?} is {} raw bytes, use set_bytes", name, len)
            }
        };
        self
    }

    /// Write a raw byte field (MAC addresses)
    pub fn set_bytes(
        &mut self,
        layout: &HeaderLayout,
        start: usize,
        name: &str,
        value: &[u8],
    ) -> &mut Self {
        let field = match layout.field(name) {
            Some(f) => f,
            None => panic!("{} header has no field named {:?}", layout.protocol, name),
        };
        match field.kind {
            FieldKind::Bytes(len) => {
                assert_eq!(value.len(), len, "field {:?} takes {} bytes", name, len);
                let at = start + field.byte;
                self.bytes[at..at + len].copy_from_slice(value);
            }
            _ => panic!("field {:?} is not a raw byte field", name),
        };
        self
    }

    /// Append opaque payload bytes after the headers
    pub fn payload(&mut self, data: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use crate::layout;

    use super::*;

    #[test]
    fn ethernet_fields_land_at_wire_offsets() {
        let mut b = FrameBuilder::new();
        let eth = b.append(&layout::ETHERNET);
        b.set_bytes(&layout::ETHERNET, eth, "dst_mac", &[1, 2, 3, 4, 5, 6])
            .set(&layout::ETHERNET, eth, "ethertype", 0x0800);
        let frame = b.build();
        assert_eq!(frame.len(), 14);
        assert_eq!(&frame[0..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(&frame[12..14], &[0x08, 0x00]);
    }

    #[test]
    fn nibble_fields_share_a_byte() {
        let mut b = FrameBuilder::new();
        let ip = b.append_sized(&layout::IPV4, 20);
        b.set(&layout::IPV4, ip, "version", 4)
            .set(&layout::IPV4, ip, "ihl", 5);
        assert_eq!(b.build()[0], 0x45);
    }

    #[test]
    fn wide_bits_write_into_a_be_u16() {
        let mut b = FrameBuilder::new();
        let ip = b.append_sized(&layout::IPV4, 20);
        b.set(&layout::IPV4, ip, "dont_fragment", 1)
            .set(&layout::IPV4, ip, "fragment_offset", 0x123);
        let frame = b.build();
        assert_eq!(frame[6], 0x41);
        assert_eq!(frame[7], 0x23);
    }
}
