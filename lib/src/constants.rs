pub const MAGIC_COOKIE: u32 = 0x2112A442;

pub const TRANS_ID_LEN: usize = 12;
pub const HEADER_LEN: usize = 20;
pub const ATTR_HEADER_LEN: usize = 4;

// attributes end on a 32-bit boundary
pub const ATTR_BOUNDARY: usize = 4;

pub const MESSAGE_TYPE_BIND_REQ: u16 = 0x0001;
pub const MESSAGE_TYPE_BIND_RES: u16 = 0x0101;
pub const MESSAGE_TYPE_BIND_ERR_RES: u16 = 0x0111;

pub const ATTR_FAMILY_IPV4: u8 = 0x01;
pub const ATTR_FAMILY_IPV6: u8 = 0x02;

pub const ATTR_RESERVED: u16 = 0x0000;
pub const ATTR_MAPPED_ADDRESS: u16 = 0x0001;
pub const ATTR_RESPONSE_ADDRESS: u16 = 0x0002;
pub const ATTR_CHANGE_REQUEST: u16 = 0x0003;
pub const ATTR_SOURCE_ADDRESS: u16 = 0x0004;
pub const ATTR_CHANGED_ADDRESS: u16 = 0x0005;
pub const ATTR_USERNAME: u16 = 0x0006;
pub const ATTR_PASSWORD: u16 = 0x0007;
pub const ATTR_MESSAGE_INTEGRITY: u16 = 0x0008;
pub const ATTR_ERROR_CODE: u16 = 0x0009;
pub const ATTR_UNKNOWN_ATTRIBUTES: u16 = 0x000A;
pub const ATTR_REFLECTED_FROM: u16 = 0x000B;
pub const ATTR_REALM: u16 = 0x0014;
pub const ATTR_NONCE: u16 = 0x0015;
pub const ATTR_XOR_MAPPED_ADDRESS: u16 = 0x0020;

pub const DEFAULT_PORT: u16 = 3478;
pub const RECV_BUF_LEN: usize = 1500;

pub fn attr_name(attr_type: u16) -> &'static str {
    match attr_type {
        ATTR_RESERVED => "Reserved",
        ATTR_MAPPED_ADDRESS => "MAPPED-ADDRESS",
        ATTR_RESPONSE_ADDRESS => "RESPONSE-ADDRESS",
        ATTR_CHANGE_REQUEST => "CHANGE-REQUEST",
        ATTR_SOURCE_ADDRESS => "SOURCE-ADDRESS",
        ATTR_CHANGED_ADDRESS => "CHANGED-ADDRESS",
        ATTR_USERNAME => "USERNAME",
        ATTR_PASSWORD => "PASSWORD",
        ATTR_MESSAGE_INTEGRITY => "MESSAGE-INTEGRITY",
        ATTR_ERROR_CODE => "ERROR-CODE",
        ATTR_UNKNOWN_ATTRIBUTES => "UNKNOWN-ATTRIBUTES",
        ATTR_REFLECTED_FROM => "REFLECTED-FROM",
        ATTR_REALM => "REALM",
        ATTR_NONCE => "NONCE",
        ATTR_XOR_MAPPED_ADDRESS => "XOR-MAPPED-ADDRESS",
        _ => "UNKNOWN",
    }
}
