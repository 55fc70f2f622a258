pub mod icmp;
pub mod ip_proto;
pub mod ipv4;
