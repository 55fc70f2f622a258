use serde::Serialize;
use strum::Display;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, Serialize)]
/// Protocol collection, 1 byte
pub enum Protocol {
    // Data link layer protocols
    ETHERNET,
    ARP,
    MACSEC,

    // Network layer protocols
    IPV4,
    ICMP,
    ESP,

    // Transport layer protocols
    TCP,
    UDP,

    // Unknown protocol
    UNKNOWN,
}

impl Default for Protocol {
    #[inline]
    fn default() -> Self {
        Protocol::UNKNOWN
    }
}
