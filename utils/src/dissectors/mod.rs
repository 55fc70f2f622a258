//! Per-layer header dissectors and the frame-walking dispatcher.
//!
//! A dissector only understands one header shape. Deciding which header
//! comes next, and how many bytes it occupies, is the dispatcher's job:
//! `FrameDecoder::decode` walks link layer, network layer and
//! transport/security layer in order, committing each read through the
//! bounds-checked cursor before handing the bytes to a dissector.

use std::fmt::{Display, Formatter};

use nom::error::{ErrorKind, ParseError};
use nom::IResult;
use num_traits::FromPrimitive;

use vidocq_api as api;

use api::headers::Header;
use api::packet::Protocol;

use crate::bits;
use crate::cursor::Cursor;
use crate::layout::{self, HeaderLayout, HeaderLength};

pub mod link;
pub mod network;
pub mod security;
pub mod transport;

pub use link::ethernet::EtherType;
use network::ip_proto;

#[derive(Debug, PartialEq)]
pub enum Error {
    /// Frame ended before a required header or field could be read.
    /// `needed` is how many bytes past the end the read would have gone.
    Truncated { offset: usize, needed: usize },
    /// A type/protocol code outside the known set at a point where the
    /// decoder must choose how to proceed
    UnsupportedProtocol(u16),
    /// An ICMP type byte outside the decoded set; kept apart from
    /// `UnsupportedProtocol` so the message names the right layer
    UnsupportedIcmpType(u8),
    /// A self-reported header length (IHL, data offset) below the
    /// protocol's minimum word count
    InvalidLength { protocol: Protocol, words: u32 },
    Nom(ErrorKind),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Truncated { offset, needed } => write!(
                f,
                "Frame truncated at offset {}, {} more byte(s) required",
                offset, needed
            ),
            Error::UnsupportedProtocol(code) => {
                write!(f, "Unsupported protocol code 0x{:04x}", code)
            }
            Error::UnsupportedIcmpType(icmp_type) => {
                write!(f, "Unsupported ICMP type {}", icmp_type)
            }
            Error::InvalidLength { protocol, words } => write!(
                f,
                "Invalid {} header length field ({} words)",
                protocol, words
            ),
            Error::Nom(_) => write!(f, "Header field parse error"),
        }
    }
}

impl<I> ParseError<I> for Error {
    fn from_error_kind(_: I, kind: ErrorKind) -> Self {
        Error::Nom(kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl std::error::Error for Error {}

/// Run a nom parser over an already-committed header slice. The cursor has
/// bounds-checked the slice length, so an Incomplete here means the layout
/// tables and a dissector disagree.
pub(crate) fn complete<T>(result: IResult<&[u8], T, Error>) -> Result<T, Error> {
    match result {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(Error::Nom(ErrorKind::Eof)),
    }
}

/// Decode outcome of a single pass. Headers decoded before a failure stay
/// valid and are returned alongside the error.
#[derive(Debug, Default)]
pub struct DecodeResult {
    /// Headers in wire order, outermost first
    pub headers: Vec<Header>,
    /// Bytes left after the last decoded header, reported opaque
    pub payload_len: usize,
    pub error: Option<Error>,
}

enum State {
    Link,
    Network,
    Transport(u8),
    /// Remaining bytes are opaque payload
    Payload,
    /// Terminal header with nothing nested beneath it (ARP)
    Done,
}

#[derive(Default)]
pub struct FrameDecoder {}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one captured frame. Never panics on malformed input; a
    /// malformed frame yields the partial header list plus the error.
    pub fn decode(&self, frame: &[u8]) -> DecodeResult {
        let mut cursor = Cursor::new(frame);
        let mut headers = Vec::new();
        let error = self.run(&mut cursor, &mut headers).err();
        DecodeResult {
            payload_len: cursor.remaining(),
            headers,
            error,
        }
    }

    fn run(&self, cursor: &mut Cursor, headers: &mut Vec<Header>) -> Result<(), Error> {
        let mut state = State::Link;
        loop {
            state = match state {
                State::Link => self.decode_link(cursor, headers)?,
                State::Network => self.decode_network(cursor, headers)?,
                State::Transport(proto) => self.decode_transport(proto, cursor, headers)?,
                State::Payload | State::Done => return Ok(()),
            };
        }
    }

    fn decode_link(&self, cursor: &mut Cursor, headers: &mut Vec<Header>) -> Result<State, Error> {
        let data = cursor.read_fixed(committed_len(cursor, &layout::ETHERNET)?)?;
        let eth = link::ethernet::dissect(data)?;
        let etype = eth.ethertype;
        headers.push(Header::Ethernet(eth));

        match EtherType::from_u16(etype) {
            Some(EtherType::IPV4) => Ok(State::Network),
            Some(EtherType::ARP) => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::ARP)?)?;
                headers.push(Header::Arp(link::arp::dissect(data)?));
                // ARP carries no nested header, trailing bytes are padding
                Ok(State::Done)
            }
            Some(EtherType::MACSEC) => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::MACSEC)?)?;
                headers.push(Header::Macsec(security::macsec::dissect(data)?));
                // payload behind the SecTAG is ciphertext, not decoded
                Ok(State::Payload)
            }
            // IPv6 is recognized but deliberately not decoded
            Some(EtherType::IPV6) => Err(Error::UnsupportedProtocol(etype)),
            None => Err(Error::UnsupportedProtocol(etype)),
        }
    }

    fn decode_network(
        &self,
        cursor: &mut Cursor,
        headers: &mut Vec<Header>,
    ) -> Result<State, Error> {
        let data = cursor.read_fixed(committed_len(cursor, &layout::IPV4)?)?;
        let ipv4 = network::ipv4::dissect(data)?;
        let proto = ipv4.protocol;
        headers.push(Header::Ipv4(ipv4));

        match proto {
            ip_proto::ICMP | ip_proto::TCP | ip_proto::UDP | ip_proto::ESP => {
                Ok(State::Transport(proto))
            }
            // unknown transports are valid IP payloads, just not decoded
            _ => Ok(State::Payload),
        }
    }

    fn decode_transport(
        &self,
        proto: u8,
        cursor: &mut Cursor,
        headers: &mut Vec<Header>,
    ) -> Result<State, Error> {
        match proto {
            ip_proto::TCP => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::TCP)?)?;
                headers.push(Header::Tcp(transport::tcp::dissect(data)?));
            }
            ip_proto::UDP => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::UDP)?)?;
                headers.push(Header::Udp(transport::udp::dissect(data)?));
            }
            ip_proto::ICMP => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::ICMP_ECHO)?)?;
                headers.push(network::icmp::dissect(data)?);
            }
            ip_proto::ESP => {
                let data = cursor.read_fixed(committed_len(cursor, &layout::ESP)?)?;
                headers.push(Header::Esp(security::esp::dissect(data)?));
            }
            _ => return Err(Error::UnsupportedProtocol(proto as u16)),
        };
        Ok(State::Payload)
    }
}

/// Number of bytes the next header occupies, per its catalog entry. For
/// variable-length headers the length nibble is peeked through the cursor
/// before anything is committed.
fn committed_len(cursor: &Cursor, layout: &HeaderLayout) -> Result<usize, Error> {
    match layout.length {
        HeaderLength::Fixed(len) => Ok(len),
        HeaderLength::Variable {
            length_byte,
            bit_offset,
            width,
            unit,
            min_words,
        } => {
            let byte = cursor.peek_byte(length_byte)?;
            let words = bits::extract(byte as u32, bit_offset, width);
            if words < min_words {
                return Err(Error::InvalidLength {
                    protocol: layout.protocol,
                    words,
                });
            }
            Ok(words as usize * unit)
        }
    }
}
