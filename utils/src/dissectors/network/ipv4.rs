use std::net::Ipv4Addr;

use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use vidocq_api as api;

use api::headers::Ipv4Header;

use crate::bits;
use crate::dissectors::{complete, Error};

/// Decode an IPv4 header from its committed slice. The dispatcher has
/// already sized the slice from the IHL nibble, so options (IHL > 5) are
/// inside `data` but left undecoded.
pub fn dissect(data: &[u8]) -> Result<Ipv4Header, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], Ipv4Header, Error> {
    let (data, vhl) = be_u8(data)?;
    let (data, tos) = be_u8(data)?;
    let (data, total_length) = be_u16(data)?;
    let (data, identification) = be_u16(data)?;
    let (data, flags_frag) = be_u16(data)?;
    let (data, ttl) = be_u8(data)?;
    let (data, protocol) = be_u8(data)?;
    let (data, checksum) = be_u16(data)?;
    let (data, src) = be_u32(data)?;
    let (data, dst) = be_u32(data)?;

    let header = Ipv4Header {
        // version high nibble, IHL low nibble
        version: bits::extract(vhl as u32, 4, 4) as u8,
        ihl: bits::extract(vhl as u32, 0, 4) as u8,
        dscp: bits::extract(tos as u32, 2, 6) as u8,
        ecn: bits::extract(tos as u32, 0, 2) as u8,
        total_length,
        identification,
        reserved: bits::extract(flags_frag as u32, 15, 1) == 1,
        dont_fragment: bits::extract(flags_frag as u32, 14, 1) == 1,
        more_fragments: bits::extract(flags_frag as u32, 13, 1) == 1,
        fragment_offset: bits::extract(flags_frag as u32, 0, 13) as u16,
        ttl,
        protocol,
        checksum,
        src_addr: Ipv4Addr::from(src),
        dst_addr: Ipv4Addr::from(dst),
    };
    Ok((data, header))
}
