use bytes::Bytes;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use stun_nat::attrs::xor_address::XorMappedAddress;
use stun_nat::client::{Client, ClientConfig, DatagramSocket, Transport};
use stun_nat::constants::*;
use stun_nat::error::Error;
use stun_nat::header::Header;
use stun_nat::message::Message;
use stun_nat::url::{Scheme, StunUrl};
use tokio::net::UdpSocket;

#[derive(Clone, Copy)]
enum Reply {
    Binding,
    WrongTransId,
    Hang,
}

struct ScriptedSocket {
    send_failures: u8,
    recv_failures: u8,
    reply: Reply,
    sends: AtomicU8,
    recvs: AtomicU8,
    last_sent: Mutex<Vec<u8>>,
}

impl ScriptedSocket {
    fn new(send_failures: u8, recv_failures: u8, reply: Reply) -> Self {
        Self {
            send_failures,
            recv_failures,
            reply,
            sends: AtomicU8::new(0),
            recvs: AtomicU8::new(0),
            last_sent: Mutex::new(vec![]),
        }
    }
}

fn reflexive() -> SocketAddr {
    "203.0.113.7:40000".parse().unwrap()
}

impl DatagramSocket for ScriptedSocket {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        let n = self.sends.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.send_failures {
            return Err(io::Error::new(io::ErrorKind::Other, "send refused"));
        }

        *self.last_sent.lock().unwrap() = buf.to_vec();
        Ok(buf.len())
    }

    async fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.recvs.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.recv_failures {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "recv refused"));
        }

        let sent = Bytes::from(self.last_sent.lock().unwrap().clone());
        let request = Message::decode(sent).unwrap();

        let mut trans_id = *request.trans_id();
        match self.reply {
            Reply::Binding => {}
            Reply::WrongTransId => trans_id[0] ^= 0xFF,
            Reply::Hang => std::future::pending::<()>().await,
        }

        let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, trans_id);
        let response = Message::new(
            header,
            vec![XorMappedAddress::new(trans_id, reflexive()).into()],
        );
        let data = response.encode().unwrap();
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }
}

fn config(max_retry: u8) -> ClientConfig {
    ClientConfig::default()
        .with_max_retry(max_retry)
        .with_timeout(Duration::from_millis(50))
        .with_retry_delay(Duration::from_millis(1))
}

#[test]
pub fn test_default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.max_retry, 3);
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.retry_delay, Duration::from_millis(200));
    assert_eq!(config.local_address, None);
}

#[tokio::test]
async fn test_request() {
    let mut client = Client::with_socket(ScriptedSocket::new(0, 0, Reply::Binding), config(3));

    let request = Message::binding_request();
    let response = client.request(&request).await.unwrap();

    assert_eq!(response.msg_type(), MESSAGE_TYPE_BIND_RES);
    assert_eq!(response.trans_id(), request.trans_id());
    assert_eq!(response.xor_mapped_address().unwrap().address, reflexive());
}

#[tokio::test]
async fn test_send_retry_exhausted() {
    let socket = ScriptedSocket::new(u8::MAX, 0, Reply::Binding);
    let client = Client::with_socket(socket, config(3));
    let (client, result) = run_one(client).await;

    assert!(matches!(result, Err(Error::SendFailed { attempts: 3, .. })));
    assert_eq!(client.socket().sends.load(Ordering::SeqCst), 3);
    assert_eq!(client.socket().recvs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_send_recovers() {
    let socket = ScriptedSocket::new(2, 0, Reply::Binding);
    let client = Client::with_socket(socket, config(3));
    let (client, result) = run_one(client).await;

    assert!(result.is_ok());
    assert_eq!(client.socket().sends.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_zero_retry_means_one_attempt() {
    let socket = ScriptedSocket::new(u8::MAX, 0, Reply::Binding);
    let client = Client::with_socket(socket, config(0));
    let (client, result) = run_one(client).await;

    assert!(matches!(result, Err(Error::SendFailed { attempts: 1, .. })));
    assert_eq!(client.socket().sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recv_retry_exhausted() {
    let socket = ScriptedSocket::new(0, u8::MAX, Reply::Binding);
    let client = Client::with_socket(socket, config(3));
    let (client, result) = run_one(client).await;

    assert!(matches!(result, Err(Error::ReceiveFailed { attempts: 3, .. })));
    assert_eq!(client.socket().sends.load(Ordering::SeqCst), 1);
    assert_eq!(client.socket().recvs.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_recv_timeout() {
    let socket = ScriptedSocket::new(0, 0, Reply::Hang);
    let client = Client::with_socket(socket, config(2));
    let (client, result) = run_one(client).await;

    match result {
        Err(Error::ReceiveFailed { attempts, reason }) => {
            assert_eq!(attempts, 2);
            assert!(reason.contains("timed out"));
        }
        v => panic!("unexpected result: {:?}", v),
    }
    assert_eq!(client.socket().recvs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reject_wrong_trans_id() {
    let socket = ScriptedSocket::new(0, 0, Reply::WrongTransId);
    let client = Client::with_socket(socket, config(3));
    let (_, result) = run_one(client).await;

    assert!(matches!(result, Err(Error::UnexpectedResponse(_))));
}

async fn run_one(
    mut client: Client<ScriptedSocket>,
) -> (Client<ScriptedSocket>, Result<Message, Error>) {
    let result = client.request(&Message::binding_request()).await;
    (client, result)
}

#[tokio::test]
async fn test_loopback_binding() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server_addr = server.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut buf = vec![0u8; RECV_BUF_LEN];
        let (len, remote_addr) = server.recv_from(&mut buf).await.unwrap();
        let request = Message::decode(Bytes::copy_from_slice(&buf[..len])).unwrap();

        let trans_id = *request.trans_id();
        let header = Header::new(MESSAGE_TYPE_BIND_RES, 0, trans_id);
        let response = Message::new(
            header,
            vec![XorMappedAddress::new(trans_id, remote_addr).into()],
        );
        server
            .send_to(&response.encode().unwrap(), remote_addr)
            .await
            .unwrap();
    });

    let url = StunUrl {
        scheme: Scheme::Stun,
        host: "127.0.0.1".to_string(),
        port: server_addr.port(),
    };
    let config = ClientConfig::default().with_local_address(IpAddr::V4(Ipv4Addr::LOCALHOST));
    let mut client = Client::open(&url, config).await.unwrap();
    let local_addr = client.local_addr().unwrap();

    let response = client.request(&Message::binding_request()).await.unwrap();
    client.close();
    handle.await.unwrap();

    assert_eq!(response.xor_mapped_address().unwrap().address, local_addr);
}

#[tokio::test]
async fn test_dial_error() {
    let url = StunUrl {
        scheme: Scheme::Stun,
        host: "127.0.0.1".to_string(),
        port: 3478,
    };

    // TEST-NET-1, never assigned to a local interface
    let config = ClientConfig::default().with_local_address("192.0.2.1".parse().unwrap());
    let result = Client::open(&url, config).await;

    assert!(matches!(result, Err(Error::Dial(_))));
}

#[tokio::test]
async fn test_resolution_error() {
    // 只解析出 ipv6 地址, 被 ipv4 过滤掉
    let url = StunUrl {
        scheme: Scheme::Stun,
        host: "[::1]".to_string(),
        port: 3478,
    };
    let result = Client::open(&url, ClientConfig::default()).await;

    match result {
        Err(Error::Resolution { host, .. }) => assert_eq!(host, "[::1]:3478"),
        Err(e) => panic!("unexpected error: {:?}", e),
        Ok(_) => panic!("resolved an ipv4 address for [::1]"),
    }
}
