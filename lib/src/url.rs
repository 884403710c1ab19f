use crate::constants::DEFAULT_PORT;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Stun,
    Stuns,
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stun" => Ok(Scheme::Stun),
            "stuns" => Ok(Scheme::Stuns),
            v => Err(Error::InvalidServerUrl(format!("not a stun scheme: {}", v))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Stun => f.write_str("stun"),
            Scheme::Stuns => f.write_str("stuns"),
        }
    }
}

/// A STUN server address.
///
/// Accepted forms are `scheme:host:port`, `scheme:host`, `host:port` and
/// `host`. The scheme defaults to `stun` and the port to 3478.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl StunUrl {
    /// `host:port`, as handed to the resolver.
    pub fn host_port(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for StunUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.scheme, self.host, self.port)
    }
}

enum PortStr {
    Valid(u16),
    OutOfRange,
    NotNumeric,
}

fn parse_port(s: &str) -> PortStr {
    match s.parse::<i64>() {
        Ok(v) if (1..=65535).contains(&v) => PortStr::Valid(v as u16),
        Ok(_) => PortStr::OutOfRange,
        Err(_) => PortStr::NotNumeric,
    }
}

fn check_host(raw: &str, host: &str) -> Result<String> {
    if host.is_empty() {
        return Err(Error::InvalidServerUrl(format!("empty host: {}", raw)));
    }
    Ok(host.to_string())
}

impl FromStr for StunUrl {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(':').collect();

        match parts.as_slice() {
            [host] => Ok(Self {
                scheme: Scheme::Stun,
                host: check_host(raw, host)?,
                port: DEFAULT_PORT,
            }),

            // host:port 或者 scheme:host
            [first, second] => match parse_port(second) {
                PortStr::Valid(port) => Ok(Self {
                    scheme: Scheme::Stun,
                    host: check_host(raw, first)?,
                    port,
                }),
                PortStr::OutOfRange => Err(Error::InvalidPortRange(raw.to_string())),
                PortStr::NotNumeric => Ok(Self {
                    scheme: first.parse()?,
                    host: check_host(raw, second)?,
                    port: DEFAULT_PORT,
                }),
            },

            [scheme, host, port] => {
                let scheme = scheme.parse()?;
                let host = check_host(raw, host)?;
                match parse_port(port) {
                    PortStr::Valid(port) => Ok(Self { scheme, host, port }),
                    PortStr::OutOfRange => Err(Error::InvalidPortRange(raw.to_string())),
                    PortStr::NotNumeric => Err(Error::InvalidServerUrl(format!(
                        "port is not a number: {}",
                        raw
                    ))),
                }
            }

            _ => Err(Error::InvalidServerUrl(raw.to_string())),
        }
    }
}
