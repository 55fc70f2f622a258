//! Typed views over the fixed header shapes this project decodes.
//!
//! Every field is stored host-normalized: multi-byte integers are already
//! converted from network byte order and bit-packed sub-fields are split out,
//! so downstream consumers never touch raw bytes.

use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use crate::packet::Protocol;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EthernetHeader {
    pub dst_mac: [u8; 6],
    pub src_mac: [u8; 6],
    pub ethertype: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ArpHeader {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub hardware_len: u8,
    pub protocol_len: u8,
    pub operation: u16,
    pub sender_mac: [u8; 6],
    pub sender_ip: Ipv4Addr,
    pub target_mac: [u8; 6],
    pub target_ip: Ipv4Addr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length in 4-byte words, low nibble of byte 0
    pub ihl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub total_length: u16,
    pub identification: u16,
    pub reserved: bool,
    pub dont_fragment: bool,
    pub more_fragments: bool,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src_addr: Ipv4Addr,
    pub dst_addr: Ipv4Addr,
}

impl Ipv4Header {
    /// Header length in bytes as claimed by the IHL field
    #[inline]
    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }
}

bitflags! {
    /// TCP control bits, low 6 bits of byte 13
    #[derive(Default)]
    pub struct TcpFlags: u8 {
        const FIN = 0b0000_0001;
        const SYN = 0b0000_0010;
        const RST = 0b0000_0100;
        const PSH = 0b0000_1000;
        const ACK = 0b0001_0000;
        const URG = 0b0010_0000;
    }
}

impl Serialize for TcpFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TcpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub sequence: u32,
    pub acknowledgment: u32,
    /// Header length in 4-byte words, high nibble of byte 12
    pub data_offset: u8,
    pub flags: TcpFlags,
    pub window: u16,
    pub checksum: u16,
    pub urgent_pointer: u16,
}

impl TcpHeader {
    /// Header length in bytes as claimed by the data offset field
    #[inline]
    pub fn header_len(&self) -> usize {
        self.data_offset as usize * 4
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    pub length: u16,
    pub checksum: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IcmpEchoHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IcmpUnreachableHeader {
    pub icmp_type: u8,
    pub code: u8,
    pub checksum: u16,
    pub unused: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EspHeader {
    /// Security Parameters Index identifying the flow
    pub spi: u32,
    pub sequence: u32,
}

/// Simplified 4-byte MACsec SecTAG: TCI/AN octet, short length octet and a
/// 16-bit packet number. Payload behind it is opaque ciphertext.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MacsecHeader {
    pub end_station: bool,
    pub sci_present: bool,
    pub epon: bool,
    pub encrypted: bool,
    pub changed_text: bool,
    /// Association number, the tracker's channel identifier
    pub an: u8,
    pub short_length: u8,
    pub packet_number: u16,
}

/// One decoded header of a frame, tagged by shape
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "header", rename_all = "snake_case")]
pub enum Header {
    Ethernet(EthernetHeader),
    Arp(ArpHeader),
    Ipv4(Ipv4Header),
    Tcp(TcpHeader),
    Udp(UdpHeader),
    IcmpEcho(IcmpEchoHeader),
    IcmpUnreachable(IcmpUnreachableHeader),
    Esp(EspHeader),
    Macsec(MacsecHeader),
}

impl Header {
    pub fn protocol(&self) -> Protocol {
        match self {
            Header::Ethernet(_) => Protocol::ETHERNET,
            Header::Arp(_) => Protocol::ARP,
            Header::Ipv4(_) => Protocol::IPV4,
            Header::Tcp(_) => Protocol::TCP,
            Header::Udp(_) => Protocol::UDP,
            Header::IcmpEcho(_) | Header::IcmpUnreachable(_) => Protocol::ICMP,
            Header::Esp(_) => Protocol::ESP,
            Header::Macsec(_) => Protocol::MACSEC,
        }
    }
}
