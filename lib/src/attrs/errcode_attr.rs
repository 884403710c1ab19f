use crate::attrs::RawAttr;
use crate::constants::ATTR_ERROR_CODE;
use crate::error::{Error, Result};
use crate::util;
use bytes::{BufMut, BytesMut};

// class:  3 bit        3-6
// number: 8 bit        0-99
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           Reserved, should be 0         |Class|     Number    |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |      Reason Phrase (variable)                                ..
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrcodeAttr {
    pub code: u16,
    pub msg: String,
}

impl ErrcodeAttr {
    pub fn new(code: u16, msg: &str) -> Self {
        Self {
            code,
            msg: msg.to_string(),
        }
    }
}

impl From<ErrcodeAttr> for RawAttr {
    fn from(attr: ErrcodeAttr) -> Self {
        let mut bytes_buf = BytesMut::with_capacity(4 + attr.msg.len());
        bytes_buf.put_u16(0);
        bytes_buf.put_u16(util::pack_error_code(attr.code));
        bytes_buf.put_slice(attr.msg.as_bytes());

        RawAttr::new(ATTR_ERROR_CODE, bytes_buf.freeze())
    }
}

impl TryFrom<&RawAttr> for ErrcodeAttr {
    type Error = Error;

    fn try_from(raw_attr: &RawAttr) -> Result<Self> {
        if raw_attr.attr_type != ATTR_ERROR_CODE {
            return Err(Error::WrongAttributeType {
                expected: ATTR_ERROR_CODE,
                actual: raw_attr.attr_type,
            });
        }

        let value = &raw_attr.value;
        if value.len() < 4 {
            return Err(Error::TruncatedValue(format!(
                "err_code attr buf len:{} < 4",
                value.len()
            )));
        }

        let code = util::unpack_error_code(u16::from_be_bytes([value[2], value[3]]));
        let msg = String::from_utf8_lossy(&value[4..]).trim().to_string();

        Ok(Self { code, msg })
    }
}
