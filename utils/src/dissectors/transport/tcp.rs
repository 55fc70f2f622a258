use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use vidocq_api as api;

use api::headers::{TcpFlags, TcpHeader};

use crate::bits;
use crate::dissectors::{complete, Error};

/// Decode a TCP header from its committed slice. The dispatcher has already
/// sized the slice from the data offset nibble, so options are inside
/// `data` but left undecoded.
pub fn dissect(data: &[u8]) -> Result<TcpHeader, Error> {
    complete(parse(data))
}

fn parse(data: &[u8]) -> IResult<&[u8], TcpHeader, Error> {
    let (data, src_port) = be_u16(data)?;
    let (data, dst_port) = be_u16(data)?;
    let (data, sequence) = be_u32(data)?;
    let (data, acknowledgment) = be_u32(data)?;
    let (data, offset_byte) = be_u8(data)?;
    let (data, flag_byte) = be_u8(data)?;
    let (data, window) = be_u16(data)?;
    let (data, checksum) = be_u16(data)?;
    let (data, urgent_pointer) = be_u16(data)?;

    let header = TcpHeader {
        src_port,
        dst_port,
        sequence,
        acknowledgment,
        // data offset is the HIGH nibble, unlike IPv4's IHL
        data_offset: bits::extract(offset_byte as u32, 4, 4) as u8,
        flags: TcpFlags::from_bits_truncate(bits::extract(flag_byte as u32, 0, 6) as u8),
        window,
        checksum,
        urgent_pointer,
    };
    Ok((data, header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syn_ack_to_http() {
        #[rustfmt::skip]
        let buf = [
            0x01, 0xbb, 0x00, 0x50, // ports 443 -> 80
            0x00, 0x00, 0x10, 0x00, // seq
            0x00, 0x00, 0x20, 0x00, // ack
            0x50, 0x12,             // offset 5, SYN+ACK
            0xfa, 0xf0,             // window
            0xbe, 0xef,             // checksum
            0x00, 0x00,             // urgent
        ];
        let header = dissect(&buf).unwrap();
        assert_eq!(header.src_port, 443);
        assert_eq!(header.dst_port, 80);
        assert_eq!(header.sequence, 0x1000);
        assert_eq!(header.acknowledgment, 0x2000);
        assert_eq!(header.data_offset, 5);
        assert_eq!(header.header_len(), 20);
        assert!(header.flags.contains(TcpFlags::SYN));
        assert!(header.flags.contains(TcpFlags::ACK));
        assert!(!header.flags.contains(TcpFlags::FIN));
        assert_eq!(header.window, 0xfaf0);
    }

    #[test]
    fn all_flags() {
        let mut buf = [0u8; 20];
        buf[12] = 0x50;
        buf[13] = 0b0011_1111;
        let header = dissect(&buf).unwrap();
        assert_eq!(
            header.flags,
            TcpFlags::FIN | TcpFlags::SYN | TcpFlags::RST
                | TcpFlags::PSH | TcpFlags::ACK | TcpFlags::URG
        );
    }

    #[test]
    fn offset_nibble_is_high() {
        let mut buf = [0u8; 60];
        buf[12] = 0xf0; // data offset 15 -> 60 byte header
        let header = dissect(&buf).unwrap();
        assert_eq!(header.data_offset, 15);
        assert_eq!(header.header_len(), 60);
    }
}
