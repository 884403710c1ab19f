#![allow(clippy::len_without_is_empty)]

use crate::constants::*;
use crate::error::{Error, Result};
use bytes::{BufMut, BytesMut};

pub type TransId = [u8; TRANS_ID_LEN];

// rfc 8489, 5
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |0 0|     STUN Message Type     |         Message Length        |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                         Magic Cookie                          |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                     Transaction ID (96 bits)                  |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub msg_type: u16,

    // attribute 部分的长度, 不包括header的20字节
    pub msg_len: u16,

    pub cookie: u32,

    pub trans_id: TransId,
}

impl Header {
    pub fn new(msg_type: u16, msg_len: u16, trans_id: TransId) -> Self {
        Self {
            msg_type,
            msg_len,
            cookie: MAGIC_COOKIE,
            trans_id,
        }
    }

    pub fn len(&self) -> usize {
        HEADER_LEN
    }

    pub fn pack_into(&self, buf: &mut BytesMut) {
        buf.put_u16(self.msg_type);
        buf.put_u16(self.msg_len);
        buf.put_u32(self.cookie);
        buf.put_slice(&self.trans_id);
    }

    pub fn unpack(buf: &[u8]) -> Result<Self> {
        // 只检查长度，不检查有效性
        if buf.len() < HEADER_LEN {
            return Err(Error::MalformedHeader(format!(
                "header buf len:{} < {}",
                buf.len(),
                HEADER_LEN
            )));
        }

        let mut index = 0_usize;
        let msg_type = u16::from_be_bytes([buf[index], buf[index + 1]]);

        index += 2;
        let msg_len = u16::from_be_bytes([buf[index], buf[index + 1]]);

        index += 2;
        let cookie = u32::from_be_bytes([
            buf[index],
            buf[index + 1],
            buf[index + 2],
            buf[index + 3],
        ]);

        index += 4;
        let mut trans_id = [0_u8; TRANS_ID_LEN];
        trans_id.copy_from_slice(&buf[index..index + TRANS_ID_LEN]);

        Ok(Self {
            msg_type,
            msg_len,
            cookie,
            trans_id,
        })
    }
}
