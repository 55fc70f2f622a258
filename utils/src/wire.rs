//! Network byte order conversions.
//!
//! Multi-byte header fields arrive big-endian. Everything that turns wire
//! bytes into host integers (or back, for synthesized frames) goes through
//! these helpers or nom's `be_*` combinators, so decoded values come out
//! identical regardless of the host's native endianness.

#[inline]
pub fn to_host_u16(wire: [u8; 2]) -> u16 {
    u16::from_be_bytes(wire)
}

#[inline]
pub fn to_host_u32(wire: [u8; 4]) -> u32 {
    u32::from_be_bytes(wire)
}

#[inline]
pub fn to_wire_u16(host: u16) -> [u8; 2] {
    host.to_be_bytes()
}

#[inline]
pub fn to_wire_u32(host: u32) -> [u8; 4] {
    host.to_be_bytes()
}
