//! IP protocol numbers
//!
//! https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml

pub const ICMP: u8 = 1;
pub const TCP: u8 = 6;
pub const UDP: u8 = 17;
pub const ESP: u8 = 50;
