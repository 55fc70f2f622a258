//! Sub-byte bit field helpers.
//!
//! The two places a header byte carries two 4-bit fields (IPv4 version/IHL
//! and TCP data offset/reserved) are decoded through `extract` so the nibble
//! order is spelled out at the call site instead of buried in a shift.

/// Right-justified value of `bit_width` bits starting `bit_offset` bits above
/// the LSB of `container`. `container` must already be in host order.
#[inline]
pub fn extract(container: u32, bit_offset: u32, bit_width: u32) -> u32 {
    debug_assert!(bit_width >= 1 && bit_width <= 32);
    debug_assert!(bit_offset + bit_width <= 32);
    let mask = if bit_width == 32 {
        u32::MAX
    } else {
        (1 << bit_width) - 1
    };
    (container >> bit_offset) & mask
}

/// Clear the selected bits of `container` and OR in `value`. Only used by
/// test fixtures and the sample frame synthesizer, never on the decode path.
#[inline]
pub fn set(container: u32, bit_offset: u32, bit_width: u32, value: u32) -> u32 {
    debug_assert!(bit_width >= 1 && bit_width <= 32);
    debug_assert!(bit_offset + bit_width <= 32);
    let mask = if bit_width == 32 {
        u32::MAX
    } else {
        (1 << bit_width) - 1
    };
    (container & !(mask << bit_offset)) | ((value & mask) << bit_offset)
}
