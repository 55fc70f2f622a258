//! End-to-end decode passes over synthesized frames.
//!
//! Frames are built through the layout catalog, decoded through the
//! dispatcher, and the decoded fields compared against the values that were
//! written, so the builder and every dissector agree on the byte layouts.

use vidocq_api as api;
use vidocq_utils as utils;

use api::headers::{Header, TcpFlags};
use utils::dissectors::{Error, FrameDecoder};
use utils::layout;
use utils::synth::FrameBuilder;
use utils::tracker::{FlowKey, GapReport, SequenceTracker, WrapPolicy};

const CLIENT_MAC: [u8; 6] = [0xcc, 0x04, 0x0d, 0x5c, 0xf0, 0x00];
const SERVER_MAC: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];

/// Ethernet + IPv4 skeleton; returns (builder, ipv4 start offset)
fn ip_frame(protocol: u64, total_length: u64) -> (FrameBuilder, usize) {
    let mut b = FrameBuilder::new();
    let eth = b.append(&layout::ETHERNET);
    b.set_bytes(&layout::ETHERNET, eth, "dst_mac", &SERVER_MAC)
        .set_bytes(&layout::ETHERNET, eth, "src_mac", &CLIENT_MAC)
        .set(&layout::ETHERNET, eth, "ethertype", 0x0800);
    let ip = b.append_sized(&layout::IPV4, 20);
    b.set(&layout::IPV4, ip, "version", 4)
        .set(&layout::IPV4, ip, "ihl", 5)
        .set(&layout::IPV4, ip, "total_length", total_length)
        .set(&layout::IPV4, ip, "ttl", 64)
        .set(&layout::IPV4, ip, "protocol", protocol)
        .set(&layout::IPV4, ip, "src_addr", u64::from(u32::from(std::net::Ipv4Addr::new(192, 168, 1, 10))))
        .set(&layout::IPV4, ip, "dst_addr", u64::from(u32::from(std::net::Ipv4Addr::new(10, 0, 0, 80))));
    (b, ip)
}

#[test]
fn tcp_syn_ack_round_trip() {
    let (mut b, _) = ip_frame(6, 60);
    let tcp = b.append_sized(&layout::TCP, 20);
    b.set(&layout::TCP, tcp, "src_port", 443)
        .set(&layout::TCP, tcp, "dst_port", 80)
        .set(&layout::TCP, tcp, "sequence", 0x1234_5678)
        .set(&layout::TCP, tcp, "acknowledgment", 0x9abc_def0)
        .set(&layout::TCP, tcp, "data_offset", 5)
        .set(&layout::TCP, tcp, "flags", 0b01_0010) // SYN + ACK
        .set(&layout::TCP, tcp, "window", 0xfaf0)
        .set(&layout::TCP, tcp, "urgent_pointer", 0);
    b.payload(&[0xab; 20]);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    assert_eq!(result.headers.len(), 3);
    assert_eq!(result.payload_len, 20);

    match &result.headers[0] {
        Header::Ethernet(eth) => {
            assert_eq!(eth.dst_mac, SERVER_MAC);
            assert_eq!(eth.src_mac, CLIENT_MAC);
            assert_eq!(eth.ethertype, 0x0800);
        }
        other => panic!("expected ethernet first, got {:?}", other),
    }
    match &result.headers[1] {
        Header::Ipv4(ip) => {
            assert_eq!(ip.version, 4);
            assert_eq!(ip.ihl, 5);
            assert_eq!(ip.total_length, 60);
            assert_eq!(ip.ttl, 64);
            assert_eq!(ip.protocol, 6);
            assert_eq!(ip.src_addr, std::net::Ipv4Addr::new(192, 168, 1, 10));
            assert_eq!(ip.dst_addr, std::net::Ipv4Addr::new(10, 0, 0, 80));
        }
        other => panic!("expected ipv4 second, got {:?}", other),
    }
    match &result.headers[2] {
        Header::Tcp(tcp) => {
            assert_eq!(tcp.src_port, 443);
            assert_eq!(tcp.dst_port, 80);
            assert_eq!(tcp.sequence, 0x1234_5678);
            assert_eq!(tcp.acknowledgment, 0x9abc_def0);
            assert_eq!(tcp.data_offset, 5);
            assert!(tcp.flags.contains(TcpFlags::SYN));
            assert!(tcp.flags.contains(TcpFlags::ACK));
            assert!(!tcp.flags.contains(TcpFlags::FIN));
            assert_eq!(tcp.window, 0xfaf0);
        }
        other => panic!("expected tcp third, got {:?}", other),
    }
}

#[test]
fn udp_dns_round_trip() {
    let (mut b, _) = ip_frame(17, 40);
    let udp = b.append(&layout::UDP);
    b.set(&layout::UDP, udp, "src_port", 53)
        .set(&layout::UDP, udp, "dst_port", 53)
        .set(&layout::UDP, udp, "length", 20);
    b.payload(&[0u8; 12]);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    assert_eq!(result.headers.len(), 3);
    match &result.headers[2] {
        Header::Udp(udp) => {
            assert_eq!(udp.src_port, 53);
            assert_eq!(udp.dst_port, 53);
            assert_eq!(udp.length, 20);
        }
        other => panic!("expected udp third, got {:?}", other),
    }
}

#[test]
fn icmp_echo_request() {
    let (mut b, _) = ip_frame(1, 28);
    let icmp = b.append(&layout::ICMP_ECHO);
    b.set(&layout::ICMP_ECHO, icmp, "icmp_type", 8)
        .set(&layout::ICMP_ECHO, icmp, "identifier", 0x0a39)
        .set(&layout::ICMP_ECHO, icmp, "sequence", 7);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    match &result.headers[2] {
        Header::IcmpEcho(echo) => {
            assert_eq!(echo.icmp_type, 8);
            assert_eq!(echo.identifier, 0x0a39);
            assert_eq!(echo.sequence, 7);
        }
        other => panic!("expected icmp echo, got {:?}", other),
    }
}

#[test]
fn icmp_unreachable() {
    let (mut b, _) = ip_frame(1, 28);
    let icmp = b.append(&layout::ICMP_UNREACHABLE);
    b.set(&layout::ICMP_UNREACHABLE, icmp, "icmp_type", 3)
        .set(&layout::ICMP_UNREACHABLE, icmp, "code", 1);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    match &result.headers[2] {
        Header::IcmpUnreachable(unreach) => {
            assert_eq!(unreach.icmp_type, 3);
            assert_eq!(unreach.code, 1);
        }
        other => panic!("expected icmp unreachable, got {:?}", other),
    }
}

#[test]
fn arp_is_terminal() {
    let mut b = FrameBuilder::new();
    let eth = b.append(&layout::ETHERNET);
    b.set(&layout::ETHERNET, eth, "ethertype", 0x0806);
    let arp = b.append(&layout::ARP);
    b.set(&layout::ARP, arp, "hardware_type", 1)
        .set(&layout::ARP, arp, "protocol_type", 0x0800)
        .set(&layout::ARP, arp, "hardware_len", 6)
        .set(&layout::ARP, arp, "protocol_len", 4)
        .set(&layout::ARP, arp, "operation", 2)
        .set_bytes(&layout::ARP, arp, "sender_mac", &CLIENT_MAC);
    // ethernet minimum-size padding behind the ARP body
    b.payload(&[0u8; 18]);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    assert_eq!(result.headers.len(), 2);
    match &result.headers[1] {
        Header::Arp(arp) => {
            assert_eq!(arp.operation, 2);
            assert_eq!(arp.sender_mac, CLIENT_MAC);
        }
        other => panic!("expected arp, got {:?}", other),
    }
}

#[test]
fn esp_frames_feed_the_gap_tracker() {
    let decoder = FrameDecoder::new();
    let tracker = SequenceTracker::new(WrapPolicy::Strict);

    let mut reports = Vec::new();
    for seq in [1u64, 2, 3, 5] {
        let (mut b, _) = ip_frame(50, 28);
        let esp = b.append(&layout::ESP);
        b.set(&layout::ESP, esp, "spi", 0x1001)
            .set(&layout::ESP, esp, "sequence", seq);
        let frame = b.build();

        let result = decoder.decode(&frame);
        assert!(result.error.is_none());
        match &result.headers[2] {
            Header::Esp(esp) => {
                assert_eq!(esp.spi, 0x1001);
                reports.push(tracker.observe(
                    FlowKey::Esp { spi: esp.spi },
                    esp.sequence as u64,
                ));
            }
            other => panic!("expected esp, got {:?}", other),
        }
    }

    assert_eq!(
        reports,
        vec![
            GapReport::InOrder,
            GapReport::InOrder,
            GapReport::InOrder,
            GapReport::Loss { missing: 1 },
        ]
    );
}

#[test]
fn macsec_frame_is_terminal_and_tracked() {
    let mut b = FrameBuilder::new();
    let eth = b.append(&layout::ETHERNET);
    b.set(&layout::ETHERNET, eth, "ethertype", 0x88e5);
    let tag = b.append(&layout::MACSEC);
    b.set(&layout::MACSEC, tag, "encrypted", 1)
        .set(&layout::MACSEC, tag, "an", 1)
        .set(&layout::MACSEC, tag, "packet_number", 9);
    b.payload(&[0x5a; 32]); // opaque ciphertext
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    assert!(result.error.is_none());
    assert_eq!(result.headers.len(), 2);
    assert_eq!(result.payload_len, 32);

    let tracker = SequenceTracker::new(WrapPolicy::Modulo16);
    match &result.headers[1] {
        Header::Macsec(tag) => {
            assert!(tag.encrypted);
            assert_eq!(
                tracker.observe(FlowKey::Macsec { an: tag.an }, tag.packet_number as u64),
                GapReport::InOrder
            );
        }
        other => panic!("expected macsec, got {:?}", other),
    }
}

#[test]
fn truncated_inner_header_returns_partial_list() {
    let (mut b, _) = ip_frame(6, 60);
    let tcp = b.append_sized(&layout::TCP, 20);
    b.set(&layout::TCP, tcp, "data_offset", 5);
    let mut frame = b.build();
    frame.truncate(14 + 20 + 6); // cut into the TCP header

    let result = FrameDecoder::new().decode(&frame);
    assert_eq!(result.headers.len(), 2);
    assert!(matches!(result.error, Some(Error::Truncated { .. })));
}

#[test]
fn headers_serialize_for_downstream_consumers() {
    let (mut b, _) = ip_frame(17, 28);
    let udp = b.append(&layout::UDP);
    b.set(&layout::UDP, udp, "dst_port", 53);
    let frame = b.build();

    let result = FrameDecoder::new().decode(&frame);
    let json = serde_json::to_string(&result.headers).unwrap();
    assert!(json.contains("\"dst_port\":53"));
    assert!(json.contains("\"ethernet\""));
}
