//! Declarative byte layouts of every header shape this project decodes.
//!
//! Each entry is immutable data: the header's committed length (fixed, or a
//! rule for deriving it from a length nibble) plus the ordered field list.
//! The dispatcher reads lengths from here, the frame synthesizer writes
//! fields through here, and the tests cross-check dissector output against
//! the same tables.

use vidocq_api as api;

use api::packet::Protocol;

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    Bytes(usize),
    /// Sub-byte field inside the byte at `byte`
    Bits { bit_offset: u32, width: u32 },
    /// Sub-field inside the big-endian u16 starting at `byte`
    WideBits { bit_offset: u32, width: u32 },
}

#[derive(Clone, Copy, Debug)]
pub struct FieldLayout {
    pub name: &'static str,
    /// Byte position relative to the start of the header
    pub byte: usize,
    pub kind: FieldKind,
}

#[derive(Clone, Copy, Debug)]
pub enum HeaderLength {
    Fixed(usize),
    /// Length derived from a nibble: `unit * nibble_value` bytes, rejected
    /// as InvalidLength when the value is below `min_words`
    Variable {
        length_byte: usize,
        bit_offset: u32,
        width: u32,
        unit: usize,
        min_words: u32,
    },
}

pub struct HeaderLayout {
    pub protocol: Protocol,
    pub length: HeaderLength,
    pub fields: &'static [FieldLayout],
}

impl HeaderLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub static ETHERNET: HeaderLayout = HeaderLayout {
    protocol: Protocol::ETHERNET,
    length: HeaderLength::Fixed(14),
    fields: &[
        FieldLayout { name: "dst_mac", byte: 0, kind: FieldKind::Bytes(6) },
        FieldLayout { name: "src_mac", byte: 6, kind: FieldKind::Bytes(6) },
        FieldLayout { name: "ethertype", byte: 12, kind: FieldKind::U16 },
    ],
};

/// ARP for IPv4 over Ethernet only, hence the fixed 28 byte shape
pub static ARP: HeaderLayout = HeaderLayout {
    protocol: Protocol::ARP,
    length: HeaderLength::Fixed(28),
    fields: &[
        FieldLayout { name: "hardware_type", byte: 0, kind: FieldKind::U16 },
        FieldLayout { name: "protocol_type", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "hardware_len", byte: 4, kind: FieldKind::U8 },
        FieldLayout { name: "protocol_len", byte: 5, kind: FieldKind::U8 },
        FieldLayout { name: "operation", byte: 6, kind: FieldKind::U16 },
        FieldLayout { name: "sender_mac", byte: 8, kind: FieldKind::Bytes(6) },
        FieldLayout { name: "sender_ip", byte: 14, kind: FieldKind::U32 },
        FieldLayout { name: "target_mac", byte: 18, kind: FieldKind::Bytes(6) },
        FieldLayout { name: "target_ip", byte: 24, kind: FieldKind::U32 },
    ],
};

/// Version occupies the high nibble of byte 0, IHL the low nibble. The field
/// listed first in the RFC 791 diagram always takes the high nibble.
pub static IPV4: HeaderLayout = HeaderLayout {
    protocol: Protocol::IPV4,
    length: HeaderLength::Variable {
        length_byte: 0,
        bit_offset: 0,
        width: 4,
        unit: 4,
        min_words: 5,
    },
    fields: &[
        FieldLayout { name: "version", byte: 0, kind: FieldKind::Bits { bit_offset: 4, width: 4 } },
        FieldLayout { name: "ihl", byte: 0, kind: FieldKind::Bits { bit_offset: 0, width: 4 } },
        FieldLayout { name: "dscp", byte: 1, kind: FieldKind::Bits { bit_offset: 2, width: 6 } },
        FieldLayout { name: "ecn", byte: 1, kind: FieldKind::Bits { bit_offset: 0, width: 2 } },
        FieldLayout { name: "total_length", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "identification", byte: 4, kind: FieldKind::U16 },
        FieldLayout { name: "reserved", byte: 6, kind: FieldKind::WideBits { bit_offset: 15, width: 1 } },
        FieldLayout { name: "dont_fragment", byte: 6, kind: FieldKind::WideBits { bit_offset: 14, width: 1 } },
        FieldLayout { name: "more_fragments", byte: 6, kind: FieldKind::WideBits { bit_offset: 13, width: 1 } },
        FieldLayout { name: "fragment_offset", byte: 6, kind: FieldKind::WideBits { bit_offset: 0, width: 13 } },
        FieldLayout { name: "ttl", byte: 8, kind: FieldKind::U8 },
        FieldLayout { name: "protocol", byte: 9, kind: FieldKind::U8 },
        FieldLayout { name: "checksum", byte: 10, kind: FieldKind::U16 },
        FieldLayout { name: "src_addr", byte: 12, kind: FieldKind::U32 },
        FieldLayout { name: "dst_addr", byte: 16, kind: FieldKind::U32 },
    ],
};

/// Data offset takes the high nibble of byte 12, mirroring the IPv4 rule
pub static TCP: HeaderLayout = HeaderLayout {
    protocol: Protocol::TCP,
    length: HeaderLength::Variable {
        length_byte: 12,
        bit_offset: 4,
        width: 4,
        unit: 4,
        min_words: 5,
    },
    fields: &[
        FieldLayout { name: "src_port", byte: 0, kind: FieldKind::U16 },
        FieldLayout { name: "dst_port", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "sequence", byte: 4, kind: FieldKind::U32 },
        FieldLayout { name: "acknowledgment", byte: 8, kind: FieldKind::U32 },
        FieldLayout { name: "data_offset", byte: 12, kind: FieldKind::Bits { bit_offset: 4, width: 4 } },
        FieldLayout { name: "flags", byte: 13, kind: FieldKind::Bits { bit_offset: 0, width: 6 } },
        FieldLayout { name: "window", byte: 14, kind: FieldKind::U16 },
        FieldLayout { name: "checksum", byte: 16, kind: FieldKind::U16 },
        FieldLayout { name: "urgent_pointer", byte: 18, kind: FieldKind::U16 },
    ],
};

pub static UDP: HeaderLayout = HeaderLayout {
    protocol: Protocol::UDP,
    length: HeaderLength::Fixed(8),
    fields: &[
        FieldLayout { name: "src_port", byte: 0, kind: FieldKind::U16 },
        FieldLayout { name: "dst_port", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "length", byte: 4, kind: FieldKind::U16 },
        FieldLayout { name: "checksum", byte: 6, kind: FieldKind::U16 },
    ],
};

pub static ICMP_ECHO: HeaderLayout = HeaderLayout {
    protocol: Protocol::ICMP,
    length: HeaderLength::Fixed(8),
    fields: &[
        FieldLayout { name: "icmp_type", byte: 0, kind: FieldKind::U8 },
        FieldLayout { name: "code", byte: 1, kind: FieldKind::U8 },
        FieldLayout { name: "checksum", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "identifier", byte: 4, kind: FieldKind::U16 },
        FieldLayout { name: "sequence", byte: 6, kind: FieldKind::U16 },
    ],
};

pub static ICMP_UNREACHABLE: HeaderLayout = HeaderLayout {
    protocol: Protocol::ICMP,
    length: HeaderLength::Fixed(8),
    fields: &[
        FieldLayout { name: "icmp_type", byte: 0, kind: FieldKind::U8 },
        FieldLayout { name: "code", byte: 1, kind: FieldKind::U8 },
        FieldLayout { name: "checksum", byte: 2, kind: FieldKind::U16 },
        FieldLayout { name: "unused", byte: 4, kind: FieldKind::U32 },
    ],
};

/// Fixed 8-byte ESP prefix; trailer and ICV are inside the opaque payload
pub static ESP: HeaderLayout = HeaderLayout {
    protocol: Protocol::ESP,
    length: HeaderLength::Fixed(8),
    fields: &[
        FieldLayout { name: "spi", byte: 0, kind: FieldKind::U32 },
        FieldLayout { name: "sequence", byte: 4, kind: FieldKind::U32 },
    ],
};

pub static MACSEC: HeaderLayout = HeaderLayout {
    protocol: Protocol::MACSEC,
    length: HeaderLength::Fixed(4),
    fields: &[
        FieldLayout { name: "end_station", byte: 0, kind: FieldKind::Bits { bit_offset: 6, width: 1 } },
        FieldLayout { name: "sci_present", byte: 0, kind: FieldKind::Bits { bit_offset: 5, width: 1 } },
        FieldLayout { name: "epon", byte: 0, kind: FieldKind::Bits { bit_offset: 4, width: 1 } },
        FieldLayout { name: "encrypted", byte: 0, kind: FieldKind::Bits { bit_offset: 3, width: 1 } },
        FieldLayout { name: "changed_text", byte: 0, kind: FieldKind::Bits { bit_offset: 2, width: 1 } },
        FieldLayout { name: "an", byte: 0, kind: FieldKind::Bits { bit_offset: 0, width: 2 } },
        FieldLayout { name: "short_length", byte: 1, kind: FieldKind::Bits { bit_offset: 0, width: 6 } },
        FieldLayout { name: "packet_number", byte: 2, kind: FieldKind::U16 },
    ],
};
