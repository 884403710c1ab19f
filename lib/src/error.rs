use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // 只可能是长度溢出
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated attribute: {0}")]
    TruncatedAttribute(String),

    #[error("truncated attribute value: {0}")]
    TruncatedValue(String),

    #[error("wrong attribute type: expected {expected:#06x}, got {actual:#06x}")]
    WrongAttributeType { expected: u16, actual: u16 },

    #[error("unknown address family: {0:#04x}")]
    UnknownFamily(u8),

    #[error("could not resolve {host}: {reason}")]
    Resolution { host: String, reason: String },

    #[error("dial error: {0}")]
    Dial(String),

    #[error("send failed after {attempts} attempt(s): {reason}")]
    SendFailed { attempts: u8, reason: String },

    #[error("receive failed after {attempts} attempt(s): {reason}")]
    ReceiveFailed { attempts: u8, reason: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("error response: {code} {reason}")]
    ErrorResponse { code: u16, reason: String },

    #[error("missing attribute: {0:#06x}")]
    MissingAttribute(u16),

    #[error("no ipv4 address on the target interface")]
    NoLocalAddress,

    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),

    #[error("invalid port range: {0}")]
    InvalidPortRange(String),
}
