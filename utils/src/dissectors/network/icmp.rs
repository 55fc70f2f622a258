use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use vidocq_api as api;

use api::headers::{Header, IcmpEchoHeader, IcmpUnreachableHeader};

use crate::dissectors::{complete, Error};

pub const ECHO_REPLY: u8 = 0;
pub const DEST_UNREACHABLE: u8 = 3;
pub const ECHO_REQUEST: u8 = 8;

/// Both decoded ICMP shapes are 8 bytes; the type byte picks between them.
/// Types outside {0, 3, 8} are not in the decoded set.
pub fn dissect(data: &[u8]) -> Result<Header, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], Header, Error> {
    let (data, icmp_type) = be_u8(data)?;
    let (data, code) = be_u8(data)?;
    let (data, checksum) = be_u16(data)?;

    match icmp_type {
        ECHO_REPLY | ECHO_REQUEST => {
            let (data, identifier) = be_u16(data)?;
            let (data, sequence) = be_u16(data)?;
            Ok((
                data,
                Header::IcmpEcho(IcmpEchoHeader {
                    icmp_type,
                    code,
                    checksum,
                    identifier,
                    sequence,
                }),
            ))
        }
        DEST_UNREACHABLE => {
            let (data, unused) = be_u32(data)?;
            Ok((
                data,
                Header::IcmpUnreachable(IcmpUnreachableHeader {
                    icmp_type,
                    code,
                    checksum,
                    unused,
                }),
            ))
        }
        _ => Err(nom::Err::Error(Error::UnsupportedIcmpType(icmp_type))),
    }
}
