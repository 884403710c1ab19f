use crate::attrs::address::{family_of, pack_address_value, unpack_address_value};
use crate::attrs::RawAttr;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::header::TransId;
use crate::util;
use std::net::SocketAddr;

// xor-mapped-address 端口和ip需要混淆
// port 和 magic cookie 的高16位做 xor
// address(ipv4) 和 magic cookie做xor
// address(ipv6) 和 magic cookie + trans_id 做xor

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorMappedAddress {
    pub address: SocketAddr,
    pub trans_id: TransId,
}

impl XorMappedAddress {
    pub fn new(trans_id: TransId, address: SocketAddr) -> Self {
        Self { trans_id, address }
    }

    pub fn family(&self) -> u8 {
        family_of(&self.address)
    }

    /// Recovers the reflexive address from a XOR-MAPPED-ADDRESS attribute.
    ///
    /// `trans_id` is the transaction id of the message that carried the
    /// attribute; only IPv6 addresses depend on it.
    pub fn from_raw_attr(raw_attr: &RawAttr, trans_id: &TransId) -> Result<Self> {
        if raw_attr.attr_type != ATTR_XOR_MAPPED_ADDRESS {
            return Err(Error::WrongAttributeType {
                expected: ATTR_XOR_MAPPED_ADDRESS,
                actual: raw_attr.attr_type,
            });
        }

        let x_address = unpack_address_value(&raw_attr.value)?;

        Ok(Self {
            address: util::xor_address(x_address, trans_id),
            trans_id: *trans_id,
        })
    }
}

impl From<XorMappedAddress> for RawAttr {
    fn from(attr: XorMappedAddress) -> Self {
        let x_address = util::xor_address(attr.address, &attr.trans_id);
        let value = pack_address_value(&x_address).freeze();

        RawAttr::new(ATTR_XOR_MAPPED_ADDRESS, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_wrong_attr_type() {
        let value = Bytes::from_static(&[0, 1, 0, 0, 0, 0, 0, 0]);
        let raw = RawAttr::new(ATTR_MAPPED_ADDRESS, value);
        let err = XorMappedAddress::from_raw_attr(&raw, &[0; TRANS_ID_LEN]).unwrap_err();
        assert_eq!(
            err,
            Error::WrongAttributeType {
                expected: ATTR_XOR_MAPPED_ADDRESS,
                actual: ATTR_MAPPED_ADDRESS
            }
        );
    }

    #[test]
    fn test_truncated_ipv4_value() {
        let value = Bytes::from_static(&[0, 1, 0x12, 0x34, 0xE1]);
        let raw = RawAttr::new(ATTR_XOR_MAPPED_ADDRESS, value);
        let err = XorMappedAddress::from_raw_attr(&raw, &[0; TRANS_ID_LEN]).unwrap_err();
        assert!(matches!(err, Error::TruncatedValue(_)));
    }

    #[test]
    fn test_truncated_ipv6_value() {
        let raw = RawAttr::new(
            ATTR_XOR_MAPPED_ADDRESS,
            Bytes::from_static(&[0, 2, 0x12, 0x34, 1, 2, 3, 4, 5, 6, 7, 8]),
        );
        let err = XorMappedAddress::from_raw_attr(&raw, &[0; TRANS_ID_LEN]).unwrap_err();
        assert!(matches!(err, Error::TruncatedValue(_)));
    }

    #[test]
    fn test_unknown_family() {
        let value = Bytes::from_static(&[0, 3, 0, 0, 0, 0, 0, 0]);
        let raw = RawAttr::new(ATTR_XOR_MAPPED_ADDRESS, value);
        let err = XorMappedAddress::from_raw_attr(&raw, &[0; TRANS_ID_LEN]).unwrap_err();
        assert_eq!(err, Error::UnknownFamily(3));
    }
}
