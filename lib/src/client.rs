//! UDP transport for one STUN server.
//!
//! A [`Client`] owns one connected socket. Each [`Transport::request`] writes
//! the encoded request and reads one datagram back, retrying each phase up
//! to `max_retry` attempts with a fixed delay and a per-attempt deadline.

use crate::constants::{MESSAGE_TYPE_BIND_REQ, RECV_BUF_LEN};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::url::{Scheme, StunUrl};
use crate::util::print_bytes;
use bytes::Bytes;
use log::{debug, warn};
use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{sleep, timeout};

pub const DEFAULT_MAX_RETRY: u8 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Attempts per phase (write, then read). Zero is treated as one.
    pub max_retry: u8,

    /// Deadline of a single write or read attempt.
    pub timeout: Duration,

    pub retry_delay: Duration,

    /// Address to bind before connecting; unspecified IPv4 when `None`.
    pub local_address: Option<IpAddr>,

    pub log_target: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_retry: DEFAULT_MAX_RETRY,
            timeout: DEFAULT_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            local_address: None,
            log_target: "stun_nat::client".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_max_retry(mut self, max_retry: u8) -> Self {
        self.max_retry = max_retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_local_address(mut self, local_address: IpAddr) -> Self {
        self.local_address = Some(local_address);
        self
    }

    pub fn with_log_target(mut self, log_target: &str) -> Self {
        self.log_target = log_target.to_string();
        self
    }
}

/// A connected datagram socket.
#[allow(async_fn_in_trait)]
pub trait DatagramSocket {
    async fn send(&self, buf: &[u8]) -> io::Result<usize>;
    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;
}

impl DatagramSocket for UdpSocket {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        UdpSocket::send(self, buf).await
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        UdpSocket::recv(self, buf).await
    }
}

/// One request/response exchange at a time with a STUN server.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn request(&mut self, req: &Message) -> Result<Message>;

    /// Releases the underlying socket.
    fn close(self);
}

/// Opens a [`Transport`] bound to a local address.
#[allow(async_fn_in_trait)]
pub trait Dialer {
    type Transport: Transport;

    async fn dial(&self, server: &StunUrl, local: IpAddr) -> Result<Self::Transport>;
}

pub struct Client<S = UdpSocket> {
    socket: S,
    config: ClientConfig,
}

impl Client<UdpSocket> {
    pub async fn open(server: &StunUrl, config: ClientConfig) -> Result<Self> {
        let target = config.log_target.as_str();
        if server.scheme == Scheme::Stuns {
            warn!(target: target, "{}, stuns is sent over plain udp", server);
        }

        // TODO add support ipv6
        let host = server.host_port();
        let remote = lookup_host(&host)
            .await
            .map_err(|e| Error::Resolution {
                host: host.clone(),
                reason: e.to_string(),
            })?
            .find(|x| x.is_ipv4())
            .ok_or_else(|| Error::Resolution {
                host: host.clone(),
                reason: "no ipv4 address".to_string(),
            })?;

        let local_ip = config
            .local_address
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let local = SocketAddr::new(local_ip, 0);

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| Error::Dial(format!("bind {}, {}", local, e)))?;
        socket
            .connect(remote)
            .await
            .map_err(|e| Error::Dial(format!("connect {}, {}", remote, e)))?;

        debug!(
            target: target,
            "{:?} --> {} ({})",
            socket.local_addr(),
            remote,
            host
        );

        Ok(Self::with_socket(socket, config))
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl<S: DatagramSocket> Client<S> {
    pub fn with_socket(socket: S, config: ClientConfig) -> Self {
        Self { socket, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }

    fn target(&self) -> &str {
        self.config.log_target.as_str()
    }

    async fn retry<T, F, Fut>(
        &self,
        phase: &str,
        mut op: F,
    ) -> std::result::Result<T, (u8, String)>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = io::Result<T>>,
    {
        let attempts = self.config.max_retry.max(1);
        let mut attempt = 0_u8;

        loop {
            attempt += 1;
            let reason = match timeout(self.config.timeout, op()).await {
                Ok(Ok(v)) => return Ok(v),
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("timed out after {:?}", self.config.timeout),
            };

            if attempt >= attempts {
                return Err((attempt, reason));
            }

            warn!(
                target: self.target(),
                "{} attempt {}/{} failed, {}",
                phase,
                attempt,
                attempts,
                reason
            );
            sleep(self.config.retry_delay).await;
        }
    }
}

impl<S: DatagramSocket> Transport for Client<S> {
    async fn request(&mut self, req: &Message) -> Result<Message> {
        let buf = req.encode()?;
        debug!(
            target: self.target(),
            "request len: {}\n{}",
            buf.len(),
            print_bytes(&buf, " ", 8)
        );

        let socket = &self.socket;
        let payload: &[u8] = &buf;
        let sent = self
            .retry("send", move || socket.send(payload))
            .await
            .map_err(|(attempts, reason)| Error::SendFailed { attempts, reason })?;
        debug!(target: self.target(), "sent: {}", sent);

        let data = self
            .retry("recv", move || async move {
                let mut recv_buf = vec![0_u8; RECV_BUF_LEN];
                let len = socket.recv(&mut recv_buf).await?;
                recv_buf.truncate(len);
                Ok::<_, io::Error>(recv_buf)
            })
            .await
            .map_err(|(attempts, reason)| Error::ReceiveFailed { attempts, reason })?;

        let data = Bytes::from(data);
        debug!(
            target: self.target(),
            "recv len: {}\n{}",
            data.len(),
            print_bytes(&data, " ", 8)
        );

        let response = Message::decode(data)?;
        if response.trans_id() != req.trans_id() {
            return Err(Error::UnexpectedResponse(format!(
                "transaction id {} != {}",
                print_bytes(response.trans_id(), "", 12).trim_end(),
                print_bytes(req.trans_id(), "", 12).trim_end()
            )));
        }
        if response.msg_type() == MESSAGE_TYPE_BIND_REQ {
            return Err(Error::UnexpectedResponse("got a binding request back".to_string()));
        }

        Ok(response)
    }

    fn close(self) {
        debug!(target: self.target(), "close");
    }
}

/// Dials real UDP clients sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct UdpDialer {
    pub config: ClientConfig,
}

impl UdpDialer {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl Dialer for UdpDialer {
    type Transport = Client<UdpSocket>;

    async fn dial(&self, server: &StunUrl, local: IpAddr) -> Result<Self::Transport> {
        let config = self.config.clone().with_local_address(local);
        Client::open(server, config).await
    }
}
