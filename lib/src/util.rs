use crate::constants::{ATTR_BOUNDARY, MAGIC_COOKIE, TRANS_ID_LEN};
use crate::header::TransId;
use rand::prelude::*;
use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

pub fn print_bytes(buf: &[u8], separator: &str, row_width: usize) -> String {
    let mut hex = String::new();
    buf.iter().enumerate().for_each(|(x, y)| {
        let _ = write!(hex, "{:02X}", y);
        if (x + 1) % row_width == 0 {
            hex.push('\n');
        } else {
            hex.push_str(separator);
        }
    });

    hex
}

pub fn new_trans_id() -> TransId {
    let mut trans_id = [0u8; TRANS_ID_LEN];
    rand::thread_rng().fill_bytes(&mut trans_id);
    trans_id
}

/// Rounds `len` up to the next attribute boundary.
pub fn padded_len(len: usize) -> usize {
    (len + ATTR_BOUNDARY - 1) / ATTR_BOUNDARY * ATTR_BOUNDARY
}

// xor 是对称的, 编码和解码用同一个函数

pub fn xor_port(port: u16) -> u16 {
    port ^ (MAGIC_COOKIE >> 16) as u16
}

pub fn xor_address_v4(addr: SocketAddrV4) -> SocketAddrV4 {
    let ip = u32::from(*addr.ip()) ^ MAGIC_COOKIE;
    SocketAddrV4::new(Ipv4Addr::from(ip), xor_port(addr.port()))
}

pub fn xor_address_v6(addr: SocketAddrV6, trans_id: &TransId) -> SocketAddrV6 {
    let mut key = [0_u8; 16];
    key[..4].copy_from_slice(&MAGIC_COOKIE.to_be_bytes());
    key[4..].copy_from_slice(trans_id);

    let ip = u128::from(*addr.ip()) ^ u128::from_be_bytes(key);
    SocketAddrV6::new(Ipv6Addr::from(ip), xor_port(addr.port()), 0, 0)
}

pub fn xor_address(addr: SocketAddr, trans_id: &TransId) -> SocketAddr {
    match addr {
        SocketAddr::V4(v) => SocketAddr::V4(xor_address_v4(v)),
        SocketAddr::V6(v) => SocketAddr::V6(xor_address_v6(v, trans_id)),
    }
}

pub fn pack_error_code(code: u16) -> u16 {
    let class = code / 100;
    let number = code % 100;

    (class & 0x07) << 8 | number
}

pub fn unpack_error_code(code: u16) -> u16 {
    let class = (code >> 8) & 0x07;
    let number = code & 0xff;
    class * 100 + number
}
