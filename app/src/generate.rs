//! Sample frame files for trying out the decoder.
//!
//! Frames are synthesized through the same layout catalog the decoder
//! reads, so the samples always match the wire contract. Checksums are left
//! zero; the decoder reports them but never verifies.

use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::{Context, Result};

use vidocq_utils as utils;

use utils::layout;
use utils::synth::FrameBuilder;

const CLIENT_MAC: [u8; 6] = [0xcc, 0x04, 0x0d, 0x5c, 0xf0, 0x00];
const SERVER_MAC: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];

pub fn write_samples(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Could not create sample directory {:?}", dir))?;

    write(dir, "tcp_synack.bin", tcp_synack())?;
    write(dir, "dns_query.bin", dns_query())?;
    // decode these three in order to see a loss report for sequence 3
    write(dir, "esp_seq1.bin", esp(1))?;
    write(dir, "esp_seq2.bin", esp(2))?;
    write(dir, "esp_seq4.bin", esp(4))?;
    write(dir, "macsec.bin", macsec())?;

    Ok(())
}

fn write(dir: &Path, name: &str, frame: Vec<u8>) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, &frame).with_context(|| format!("Could not write {:?}", path))?;
    println!("Wrote {:?} ({} bytes)", path, frame.len());
    Ok(())
}

/// Ethernet + IPv4 skeleton; returns the builder with both appended
fn ip_frame(protocol: u64, total_length: u64, src: Ipv4Addr, dst: Ipv4Addr) -> FrameBuilder {
    let mut b = FrameBuilder::new();
    let eth = b.append(&layout::ETHERNET);
    b.set_bytes(&layout::ETHERNET, eth, "dst_mac", &SERVER_MAC)
        .set_bytes(&layout::ETHERNET, eth, "src_mac", &CLIENT_MAC)
        .set(&layout::ETHERNET, eth, "ethertype", 0x0800);
    let ip = b.append_sized(&layout::IPV4, 20);
    b.set(&layout::IPV4, ip, "version", 4)
        .set(&layout::IPV4, ip, "ihl", 5)
        .set(&layout::IPV4, ip, "total_length", total_length)
        .set(&layout::IPV4, ip, "identification", 0x000a)
        .set(&layout::IPV4, ip, "dont_fragment", 1)
        .set(&layout::IPV4, ip, "ttl", 64)
        .set(&layout::IPV4, ip, "protocol", protocol)
        .set(&layout::IPV4, ip, "src_addr", u64::from(u32::from(src)))
        .set(&layout::IPV4, ip, "dst_addr", u64::from(u32::from(dst)));
    b
}

fn tcp_synack() -> Vec<u8> {
    let mut b = ip_frame(
        6,
        60,
        Ipv4Addr::new(10, 0, 0, 80),
        Ipv4Addr::new(192, 168, 1, 10),
    );
    let tcp = b.append_sized(&layout::TCP, 20);
    b.set(&layout::TCP, tcp, "src_port", 80)
        .set(&layout::TCP, tcp, "dst_port", 50412)
        .set(&layout::TCP, tcp, "sequence", 0x0000_1000)
        .set(&layout::TCP, tcp, "acknowledgment", 0x0000_2000)
        .set(&layout::TCP, tcp, "data_offset", 5)
        .set(&layout::TCP, tcp, "flags", 0b01_0010) // SYN + ACK
        .set(&layout::TCP, tcp, "window", 0xfaf0);
    b.payload(&[0xab; 20]);
    b.build()
}

fn dns_query() -> Vec<u8> {
    let mut b = ip_frame(
        17,
        40,
        Ipv4Addr::new(192, 168, 1, 10),
        Ipv4Addr::new(8, 8, 8, 8),
    );
    let udp = b.append(&layout::UDP);
    b.set(&layout::UDP, udp, "src_port", 53)
        .set(&layout::UDP, udp, "dst_port", 53)
        .set(&layout::UDP, udp, "length", 20);
    b.payload(&[0u8; 12]);
    b.build()
}

fn esp(sequence: u64) -> Vec<u8> {
    let mut b = ip_frame(
        50,
        48,
        Ipv4Addr::new(10, 1, 2, 1),
        Ipv4Addr::new(10, 34, 0, 1),
    );
    let esp = b.append(&layout::ESP);
    b.set(&layout::ESP, esp, "spi", 0x1001)
        .set(&layout::ESP, esp, "sequence", sequence);
    b.payload(&[0x5a; 20]); // ciphertext stand-in
    b.build()
}

fn macsec() -> Vec<u8> {
    let mut b = FrameBuilder::new();
    let eth = b.append(&layout::ETHERNET);
    b.set_bytes(&layout::ETHERNET, eth, "dst_mac", &SERVER_MAC)
        .set_bytes(&layout::ETHERNET, eth, "src_mac", &CLIENT_MAC)
        .set(&layout::ETHERNET, eth, "ethertype", 0x88e5);
    let tag = b.append(&layout::MACSEC);
    b.set(&layout::MACSEC, tag, "end_station", 1)
        .set(&layout::MACSEC, tag, "encrypted", 1)
        .set(&layout::MACSEC, tag, "changed_text", 1)
        .set(&layout::MACSEC, tag, "an", 1)
        .set(&layout::MACSEC, tag, "packet_number", 1);
    b.payload(&[0x5a; 32]);
    b.build()
}

#[cfg(test)]
mod tests {
    use vidocq_utils::dissectors::FrameDecoder;

    use super::*;

    #[test]
    fn samples_decode_cleanly() {
        let decoder = FrameDecoder::new();
        for frame in [tcp_synack(), dns_query(), esp(1), macsec()] {
            let result = decoder.decode(&frame);
            assert!(result.error.is_none(), "sample failed: {:?}", result.error);
            assert!(result.headers.len() >= 2);
        }
    }

    #[test]
    fn tcp_sample_matches_documented_shape() {
        let frame = tcp_synack();
        assert_eq!(frame.len(), 74);
        let result = FrameDecoder::new().decode(&frame);
        assert_eq!(result.headers.len(), 3);
        assert_eq!(result.payload_len, 20);
    }
}
