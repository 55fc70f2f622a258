use nom::number::complete::be_u16;
use nom::IResult;

use vidocq_api as api;

use api::headers::UdpHeader;

use crate::dissectors::{complete, Error};

pub fn dissect(data: &[u8]) -> Result<UdpHeader, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], UdpHeader, Error> {
    let (data, src_port) = be_u16(data)?;
    let (data, dst_port) = be_u16(data)?;
    let (data, length) = be_u16(data)?;
    let (data, checksum) = be_u16(data)?;

    Ok((
        data,
        UdpHeader {
            src_port,
            dst_port,
            length,
            checksum,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dns_query() {
        let buf = [0xf4, 0x63, 0x00, 0x35, 0x00, 0x28, 0x93, 0xab];
        let header = dissect(&buf).unwrap();
        assert_eq!(header.src_port, 62563);
        assert_eq!(header.dst_port, 53);
        assert_eq!(header.length, 40);
        assert_eq!(header.checksum, 0x93ab);
    }
}
