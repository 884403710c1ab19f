use crate::attrs::address::AddressAttr;
use crate::attrs::errcode_attr::ErrcodeAttr;
use crate::attrs::xor_address::XorMappedAddress;
use crate::attrs::RawAttr;
use crate::constants::*;
use crate::error::{Error, Result};
use crate::header::{Header, TransId};
use crate::util;
use bytes::{Bytes, BytesMut};
use log::{debug, warn};
use std::net::SocketAddr;

/// A STUN message: the 20-byte header and its attributes in wire order.
///
/// `header.msg_len` mirrors the padded size of `attrs`; it is kept in sync by
/// [`Message::new`] and [`Message::add_attr`] and recomputed by
/// [`Message::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub attrs: Vec<RawAttr>,
}

impl Message {
    pub fn new(header: Header, attrs: Vec<RawAttr>) -> Self {
        let mut message = Self { header, attrs };
        message.update_header_len();
        message
    }

    /// A binding request with a fresh random transaction id and no attributes.
    pub fn binding_request() -> Self {
        let header = Header::new(MESSAGE_TYPE_BIND_REQ, 0, util::new_trans_id());
        Self::new(header, vec![])
    }

    fn attrs_len(&self) -> usize {
        self.attrs.iter().fold(0_usize, |acc, x| acc + x.len())
    }

    fn update_header_len(&mut self) {
        self.header.msg_len = self.attrs_len().min(u16::MAX as usize) as u16;
    }

    pub fn add_attr(&mut self, attr: RawAttr) {
        self.attrs.push(attr);
        self.update_header_len();
    }

    pub fn msg_type(&self) -> u16 {
        self.header.msg_type
    }

    pub fn trans_id(&self) -> &TransId {
        &self.header.trans_id
    }

    pub fn attr(&self, attr_type: u16) -> Option<&RawAttr> {
        self.attrs.iter().find(|x| x.attr_type == attr_type)
    }

    pub fn xor_mapped_address(&self) -> Result<XorMappedAddress> {
        let attr = self
            .attr(ATTR_XOR_MAPPED_ADDRESS)
            .ok_or(Error::MissingAttribute(ATTR_XOR_MAPPED_ADDRESS))?;
        XorMappedAddress::from_raw_attr(attr, self.trans_id())
    }

    pub fn mapped_address(&self) -> Option<Result<SocketAddr>> {
        self.attr(ATTR_MAPPED_ADDRESS)
            .map(|attr| AddressAttr::try_from(attr).map(|v| v.address))
    }

    pub fn error_code(&self) -> Option<Result<ErrcodeAttr>> {
        self.attr(ATTR_ERROR_CODE).map(ErrcodeAttr::try_from)
    }

    pub fn encode(&self) -> Result<Bytes> {
        let attrs_len = self.attrs_len();
        if attrs_len > u16::MAX as usize {
            return Err(Error::Encoding(format!(
                "attrs len:{} > {}",
                attrs_len,
                u16::MAX
            )));
        }

        let mut header = self.header.clone();
        header.msg_len = attrs_len as u16;

        let mut buf = BytesMut::with_capacity(HEADER_LEN + attrs_len);
        header.pack_into(&mut buf);
        for v in self.attrs.iter() {
            v.pack_into(&mut buf)?;
        }

        Ok(buf.freeze())
    }

    /// Parses a datagram. Bytes past the declared attribute section are
    /// ignored. When an attribute type repeats only the first one is kept.
    pub fn decode(mut buf: Bytes) -> Result<Self> {
        let header = Header::unpack(&buf)?;
        let section = buf.split_off(HEADER_LEN);
        let section_len = header.msg_len as usize;

        let mut attrs: Vec<RawAttr> = vec![];
        let mut index = 0_usize;

        while index < section_len {
            let (attr, next) = RawAttr::unpack(&section, index)?;
            index = next;

            debug!("attr: {}, len: {}", attr.name(), attr.attr_len);

            if attrs.iter().any(|x| x.attr_type == attr.attr_type) {
                warn!("duplicate attr {}, ignored", attr.name());
                continue;
            }
            attrs.push(attr);
        }

        Ok(Self { header, attrs })
    }
}
