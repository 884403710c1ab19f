use crate::attrs::RawAttr;
use crate::constants::*;
use crate::error::{Error, Result};
use bytes::{BufMut, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// 地址类的attribute, 例如 mapped-address
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |0 0 0 0 0 0 0 0|    Family     |           Port                |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                 Address (32 bits or 128 bits)                 |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// ipv4: family: 0x01, 4 bytes
// ipv6: family: 0x02, 16 bytes

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAttr {
    pub attr_type: u16,
    pub address: SocketAddr,
}

impl AddressAttr {
    pub fn new(attr_type: u16, address: SocketAddr) -> Self {
        Self { attr_type, address }
    }

    pub fn family(&self) -> u8 {
        family_of(&self.address)
    }
}

pub(crate) fn family_of(address: &SocketAddr) -> u8 {
    match address {
        SocketAddr::V4(_) => ATTR_FAMILY_IPV4,
        SocketAddr::V6(_) => ATTR_FAMILY_IPV6,
    }
}

/// Writes the shared reserved/family/port/address layout.
pub(crate) fn pack_address_value(address: &SocketAddr) -> BytesMut {
    let mut bytes_buf = BytesMut::with_capacity(20);

    bytes_buf.put_u8(0);
    bytes_buf.put_u8(family_of(address));
    bytes_buf.put_u16(address.port());
    match address.ip() {
        IpAddr::V4(ip) => bytes_buf.put_slice(&ip.octets()),
        IpAddr::V6(ip) => bytes_buf.put_slice(&ip.octets()),
    }

    bytes_buf
}

/// Reads the shared layout without any XOR applied.
pub(crate) fn unpack_address_value(value: &[u8]) -> Result<SocketAddr> {
    if value.len() < 4 {
        return Err(Error::TruncatedValue(format!(
            "address attr buf len:{} < 4",
            value.len()
        )));
    }

    // 跳过 reserved
    let mut index = 1_usize;
    let family = value[index];

    index += 1;
    let port = u16::from_be_bytes([value[index], value[index + 1]]);

    index += 2;
    let address = match family {
        ATTR_FAMILY_IPV4 => {
            if index + 4 > value.len() {
                return Err(Error::TruncatedValue(format!(
                    "ipv4 buf len:{} < 4",
                    value.len() - index
                )));
            }
            let mut addr = [0_u8; 4];
            addr.copy_from_slice(&value[index..index + 4]);
            SocketAddr::new(IpAddr::V4(Ipv4Addr::from(addr)), port)
        }
        ATTR_FAMILY_IPV6 => {
            if index + 16 > value.len() {
                return Err(Error::TruncatedValue(format!(
                    "ipv6 buf len:{} < 16",
                    value.len() - index
                )));
            }
            let mut addr = [0_u8; 16];
            addr.copy_from_slice(&value[index..index + 16]);
            SocketAddr::new(IpAddr::V6(Ipv6Addr::from(addr)), port)
        }
        v => return Err(Error::UnknownFamily(v)),
    };

    Ok(address)
}

impl From<AddressAttr> for RawAttr {
    fn from(attr: AddressAttr) -> Self {
        let value = pack_address_value(&attr.address).freeze();
        RawAttr::new(attr.attr_type, value)
    }
}

impl TryFrom<&RawAttr> for AddressAttr {
    type Error = Error;

    fn try_from(raw_attr: &RawAttr) -> Result<Self> {
        let address = unpack_address_value(&raw_attr.value)?;
        Ok(Self {
            attr_type: raw_attr.attr_type,
            address,
        })
    }
}
