//! Human-readable and JSON rendering of decode results.

use anyhow::Result;
use fnv::FnvHashMap;
use once_cell::sync::Lazy;
use serde_json::json;

use vidocq_api as api;
use vidocq_utils as utils;

use api::headers::{Header, TcpFlags};
use utils::dissectors::DecodeResult;

use super::FlowObservation;

/// IP protocol number to display name, built once and read-only after that
static PROTOCOL_NAMES: Lazy<FnvHashMap<u8, &'static str>> = Lazy::new(|| {
    let mut names = FnvHashMap::default();
    names.insert(1, "ICMP");
    names.insert(6, "TCP");
    names.insert(17, "UDP");
    names.insert(50, "ESP");
    names
});

/// Well-known service ports, same lifecycle as PROTOCOL_NAMES
static PORT_NAMES: Lazy<FnvHashMap<u16, &'static str>> = Lazy::new(|| {
    let mut names = FnvHashMap::default();
    names.insert(20, "FTP-DATA");
    names.insert(21, "FTP");
    names.insert(22, "SSH");
    names.insert(25, "SMTP");
    names.insert(53, "DNS");
    names.insert(80, "HTTP");
    names.insert(443, "HTTPS");
    names.insert(3306, "MySQL");
    names.insert(5432, "PostgreSQL");
    names.insert(8080, "HTTP-ALT");
    names
});

fn protocol_name(proto: u8) -> &'static str {
    PROTOCOL_NAMES.get(&proto).copied().unwrap_or("Unknown")
}

fn port(value: u16) -> String {
    match PORT_NAMES.get(&value) {
        Some(name) => format!("{} ({})", value, name),
        None => value.to_string(),
    }
}

fn mac(bytes: &[u8; 6]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn tcp_flag_list(flags: TcpFlags) -> String {
    let mut names = Vec::new();
    for (flag, name) in [
        (TcpFlags::SYN, "SYN"),
        (TcpFlags::ACK, "ACK"),
        (TcpFlags::FIN, "FIN"),
        (TcpFlags::RST, "RST"),
        (TcpFlags::PSH, "PSH"),
        (TcpFlags::URG, "URG"),
    ] {
        if flags.contains(flag) {
            names.push(name);
        }
    }
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(" ")
    }
}

pub fn render_text(path: &str, frame_len: usize, result: &DecodeResult, gaps: &[FlowObservation]) {
    println!("=== {} ({} bytes) ===", path, frame_len);
    for header in &result.headers {
        match header {
            Header::Ethernet(eth) => println!(
                "Ethernet  {} -> {}  ethertype 0x{:04x}",
                mac(&eth.src_mac),
                mac(&eth.dst_mac),
                eth.ethertype
            ),
            Header::Arp(arp) => println!(
                "ARP  {} {} -> {}",
                if arp.operation == 1 { "request" } else { "reply" },
                arp.sender_ip,
                arp.target_ip
            ),
            Header::Ipv4(ip) => println!(
                "IPv4  {} -> {}  ihl={} ({} bytes) ttl={} protocol={} ({})",
                ip.src_addr,
                ip.dst_addr,
                ip.ihl,
                ip.header_len(),
                ip.ttl,
                ip.protocol,
                protocol_name(ip.protocol)
            ),
            Header::Tcp(tcp) => println!(
                "TCP  {} -> {}  seq=0x{:08x} ack=0x{:08x} window={} flags: {}",
                port(tcp.src_port),
                port(tcp.dst_port),
                tcp.sequence,
                tcp.acknowledgment,
                tcp.window,
                tcp_flag_list(tcp.flags)
            ),
            Header::Udp(udp) => println!(
                "UDP  {} -> {}  length={} checksum=0x{:04x}",
                port(udp.src_port),
                port(udp.dst_port),
                udp.length,
                udp.checksum
            ),
            Header::IcmpEcho(echo) => println!(
                "ICMP  {}  id={} seq={}",
                if echo.icmp_type == 8 { "echo request" } else { "echo reply" },
                echo.identifier,
                echo.sequence
            ),
            Header::IcmpUnreachable(unreach) => println!(
                "ICMP  destination unreachable  code={}",
                unreach.code
            ),
            Header::Esp(esp) => println!(
                "ESP  spi=0x{:08x} sequence={}",
                esp.spi, esp.sequence
            ),
            Header::Macsec(tag) => println!(
                "MACsec  an={} pn={} encrypted={}",
                tag.an, tag.packet_number, tag.encrypted
            ),
        }
    }
    println!("Payload  {} bytes", result.payload_len);
    for obs in gaps {
        println!("Sequence  {:?} counter={}  {:?}", obs.key, obs.counter, obs.report);
    }
    if let Some(err) = &result.error {
        println!("Error  {}", err);
    }
    println!();
}

pub fn render_json(path: &str, result: &DecodeResult, gaps: &[FlowObservation]) -> Result<()> {
    let value = json!({
        "file": path,
        "headers": &result.headers,
        "payload_len": result.payload_len,
        "error": result.error.as_ref().map(|e| e.to_string()),
        "gaps": gaps,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
