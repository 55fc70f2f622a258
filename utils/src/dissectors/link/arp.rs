use std::net::Ipv4Addr;

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;

use vidocq_api as api;

use api::headers::ArpHeader;

use crate::dissectors::{complete, Error};

/// IPv4-over-Ethernet ARP only, the fixed 28 byte shape
pub fn dissect(data: &[u8]) -> Result<ArpHeader, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], ArpHeader, Error> {
    let (data, hardware_type) = be_u16(data)?;
    let (data, protocol_type) = be_u16(data)?;
    let (data, hardware_len) = be_u8(data)?;
    let (data, protocol_len) = be_u8(data)?;
    let (data, operation) = be_u16(data)?;
    let (data, sha) = take(6usize)(data)?;
    let (data, spa) = nom::number::complete::be_u32(data)?;
    let (data, tha) = take(6usize)(data)?;
    let (data, tpa) = nom::number::complete::be_u32(data)?;

    let mut sender_mac = [0u8; 6];
    sender_mac.copy_from_slice(sha);
    let mut target_mac = [0u8; 6];
    target_mac.copy_from_slice(tha);

    Ok((
        data,
        ArpHeader {
            hardware_type,
            protocol_type,
            hardware_len,
            protocol_len,
            operation,
            sender_mac,
            sender_ip: Ipv4Addr::from(spa),
            target_mac,
            target_ip: Ipv4Addr::from(tpa),
        },
    ))
}
