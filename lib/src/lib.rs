//! STUN binding client and two-probe NAT mapping diagnosis.
//!
//! The codec (`message`, `header`, `attrs`) follows RFC 8489 framing. The
//! `client` module sends one binding request at a time over UDP, and
//! `diagnosis` compares two reflexive addresses to classify the mapping.

pub mod attrs;
pub mod client;
pub mod constants;
pub mod diagnosis;
pub mod error;
pub mod header;
pub mod message;
pub mod url;
pub mod util;
