use nom::bytes::complete::take;
use nom::number::complete::be_u16;
use nom::IResult;

use vidocq_api as api;

use api::headers::EthernetHeader;

use crate::dissectors::{complete, Error};

/// Ether types this decoder branches on
///
/// From Wireshark's etypes.h
/// https://github.com/wireshark/wireshark/blob/master/epan/etypes.h
#[derive(Clone, Copy, Debug, PartialEq, Primitive)]
#[repr(u16)]
pub enum EtherType {
    IPV4 = 0x0800,
    ARP = 0x0806,
    IPV6 = 0x86DD,
    /// IEEE 802.1ae Media access control security
    MACSEC = 0x88E5,
}

pub fn dissect(data: &[u8]) -> Result<EthernetHeader, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], EthernetHeader, Error> {
    let (data, dst) = take(6usize)(data)?;
    let (data, src) = take(6usize)(data)?;
    let (data, ethertype) = be_u16(data)?;

    let mut dst_mac = [0u8; 6];
    dst_mac.copy_from_slice(dst);
    let mut src_mac = [0u8; 6];
    src_mac.copy_from_slice(src);

    Ok((
        data,
        EthernetHeader {
            dst_mac,
            src_mac,
            ethertype,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok() {
        let buf = [
            0x01, 0x80, 0xc2, 0x00, 0x00, 0x00, 0xcc, 0x04, 0x0d, 0x5c, 0xf0, 0x00, 0x08, 0x00,
        ];
        let header = dissect(&buf).unwrap();
        assert_eq!(header.dst_mac, [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00]);
        assert_eq!(header.src_mac, [0xcc, 0x04, 0x0d, 0x5c, 0xf0, 0x00]);
        assert_eq!(header.ethertype, 0x0800);
    }

    #[test]
    fn ethertype_is_big_endian() {
        let buf = [0u8; 12];
        let mut buf = buf.to_vec();
        buf.extend_from_slice(&[0x88, 0xe5]);
        let header = dissect(&buf).unwrap();
        assert_eq!(header.ethertype, 0x88e5);
    }
}
