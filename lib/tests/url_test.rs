use stun_nat::error::Error;
use stun_nat::url::{Scheme, StunUrl};

fn parse(s: &str) -> Result<StunUrl, Error> {
    s.parse()
}

#[test]
pub fn test_host_only() {
    let url = parse("stun.l.google.com").unwrap();
    assert_eq!(url.scheme, Scheme::Stun);
    assert_eq!(url.host, "stun.l.google.com");
    assert_eq!(url.port, 3478);
    assert_eq!(url.host_port(), "stun.l.google.com:3478");
}

#[test]
pub fn test_host_port() {
    let url = parse("stun.l.google.com:19302").unwrap();
    assert_eq!(url.scheme, Scheme::Stun);
    assert_eq!(url.host_port(), "stun.l.google.com:19302");
}

#[test]
pub fn test_scheme_host() {
    let url = parse("stuns:stun.example.org").unwrap();
    assert_eq!(url.scheme, Scheme::Stuns);
    assert_eq!(url.host, "stun.example.org");
    assert_eq!(url.port, 3478);
}

#[test]
pub fn test_scheme_host_port() {
    let url = parse("stun:10.0.0.1:3479").unwrap();
    assert_eq!(url.scheme, Scheme::Stun);
    assert_eq!(url.host, "10.0.0.1");
    assert_eq!(url.port, 3479);
    assert_eq!(url.to_string(), "stun:10.0.0.1:3479");
}

#[test]
pub fn test_bad_scheme() {
    assert!(matches!(parse("http:example.org"), Err(Error::InvalidServerUrl(_))));
    assert!(matches!(
        parse("turn:example.org:3478"),
        Err(Error::InvalidServerUrl(_))
    ));
}

#[test]
pub fn test_port_out_of_range() {
    assert!(matches!(parse("example.org:0"), Err(Error::InvalidPortRange(_))));
    assert!(matches!(parse("example.org:65536"), Err(Error::InvalidPortRange(_))));
    assert!(matches!(
        parse("stun:example.org:70000"),
        Err(Error::InvalidPortRange(_))
    ));
}

#[test]
pub fn test_port_not_numeric() {
    assert!(matches!(
        parse("stun:example.org:abc"),
        Err(Error::InvalidServerUrl(_))
    ));
}

#[test]
pub fn test_empty_host() {
    assert!(matches!(parse(""), Err(Error::InvalidServerUrl(_))));
    assert!(matches!(parse(":3478"), Err(Error::InvalidServerUrl(_))));
    assert!(matches!(parse("stun::3478"), Err(Error::InvalidServerUrl(_))));
}

#[test]
pub fn test_too_many_parts() {
    assert!(matches!(parse("stun:a:b:3478"), Err(Error::InvalidServerUrl(_))));
}
