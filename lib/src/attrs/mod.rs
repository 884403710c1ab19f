#![allow(clippy::len_without_is_empty)]

use crate::constants::{ATTR_HEADER_LEN, attr_name};
use crate::error::{Error, Result};
use crate::util::padded_len;
use bytes::{BufMut, Bytes, BytesMut};

pub mod address;
pub mod errcode_attr;
pub mod xor_address;

//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |         Type                  |            Length             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         Value (variable)                ....
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttr {
    pub attr_type: u16,

    // value的长度, 不包括padding
    pub attr_len: u16,
    pub value: Bytes,
}

impl RawAttr {
    /// `value` longer than `u16::MAX` is rejected later by [`RawAttr::pack_into`].
    pub fn new(attr_type: u16, value: Bytes) -> Self {
        Self {
            attr_type,
            attr_len: value.len().min(u16::MAX as usize) as u16,
            value,
        }
    }

    pub fn name(&self) -> &'static str {
        attr_name(self.attr_type)
    }

    /// Bytes taken on the wire: type, length, value and padding.
    pub fn len(&self) -> usize {
        ATTR_HEADER_LEN + padded_len(self.value.len())
    }

    pub fn pack_into(&self, buf: &mut BytesMut) -> Result<()> {
        if self.value.len() > u16::MAX as usize {
            return Err(Error::Encoding(format!(
                "attr {} value len:{} > {}",
                self.name(),
                self.value.len(),
                u16::MAX
            )));
        }

        let value_len = self.value.len();
        buf.put_u16(self.attr_type);
        buf.put_u16(value_len as u16);
        buf.put_slice(&self.value);
        buf.put_bytes(0, padded_len(value_len) - value_len);

        Ok(())
    }

    /// Reads the attribute starting at `index` of the attribute section and
    /// returns it together with the index of the next one.
    pub fn unpack(section: &Bytes, index: usize) -> Result<(Self, usize)> {
        if index + ATTR_HEADER_LEN > section.len() {
            return Err(Error::TruncatedAttribute(format!(
                "attr header at {} needs {} bytes, buf len:{}",
                index,
                ATTR_HEADER_LEN,
                section.len()
            )));
        }

        let attr_type = u16::from_be_bytes([section[index], section[index + 1]]);
        let attr_len = u16::from_be_bytes([section[index + 2], section[index + 3]]);

        let value_start = index + ATTR_HEADER_LEN;
        let value_end = value_start + attr_len as usize;
        if value_end > section.len() {
            return Err(Error::TruncatedAttribute(format!(
                "attr {} len:{} at {}, buf len:{}",
                attr_name(attr_type),
                attr_len,
                index,
                section.len()
            )));
        }

        let attr = Self {
            attr_type,
            attr_len,
            value: section.slice(value_start..value_end),
        };
        let next = value_start + padded_len(attr_len as usize);

        Ok((attr, next))
    }
}
