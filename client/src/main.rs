use std::net::IpAddr;
use std::time::Duration;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, Command};
use client::iface::addrs_of;
use client::probe::probe_nat;
use log::{debug, error};
use stun_nat::client::ClientConfig;
use stun_nat::url::StunUrl;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// 其他可用的: stun1.l.google.com:19302, global.stun.twilio.com:3478
const DEFAULT_SERVER: &str = "stun.l.google.com:19302";
const DEFAULT_IFACE: &str = "en0";

fn parse_ip(s: &str) -> Result<IpAddr, String> {
    let ip = match s.parse::<IpAddr>() {
        Ok(v) => v,
        Err(e) => {
            return Err(format!("{}", e));
        }
    };
    // 不能是 0.0.0.0
    if ip.is_unspecified() {
        return Err(format!("{} not allow", ip));
    }

    Ok(ip)
}

fn parse_url(s: &str) -> Result<StunUrl, String> {
    s.parse::<StunUrl>().map_err(|e| format!("{}", e))
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn fail(msg: String) -> ! {
    error!("{}", msg);
    eprintln!("error: {}", msg);
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let app = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about("a stun client for probing nat mapping behavior")
        .arg(
            Arg::new("server")
                .long("server")
                .short('s')
                .takes_value(true)
                .default_value(DEFAULT_SERVER)
                .help("server url, stun(s):host:port, stun(s):host, host:port or host")
                .value_parser(ValueParser::new(parse_url)),
        )
        .arg(
            Arg::new("iface")
                .long("iface")
                .short('i')
                .takes_value(true)
                .default_value(DEFAULT_IFACE)
                .help("target network interface")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("local_ip")
                .long("local_ip")
                .takes_value(true)
                .action(ArgAction::Append)
                .help("local ip, skips interface lookup")
                .value_parser(ValueParser::new(parse_ip)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .takes_value(true)
                .default_value("5")
                .help("timeout of each send/recv attempt, seconds")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("max_retry")
                .long("max_retry")
                .takes_value(true)
                .default_value("3")
                .help("attempts for each send/recv")
                .value_parser(clap::value_parser!(u8).range(1..)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("debug log"),
        )
        .get_matches();

    let verbose = app.get_one::<bool>("verbose").copied().unwrap_or(false);
    init_logger(verbose);

    let server: StunUrl = match app.get_one::<StunUrl>("server") {
        Some(v) => v.clone(),
        None => fail("wrong server url".to_string()),
    };
    let timeout: u64 = app.get_one("timeout").copied().unwrap_or(5);
    let max_retry: u8 = app.get_one("max_retry").copied().unwrap_or(3);

    let local_ips: Vec<IpAddr> = match app.get_many::<IpAddr>("local_ip") {
        Some(v) => v.copied().collect(),
        None => {
            let iface = app
                .get_one::<String>("iface")
                .map(String::as_str)
                .unwrap_or(DEFAULT_IFACE);
            match addrs_of(iface) {
                Ok((mut ip4, ip6)) => {
                    ip4.extend(ip6);
                    ip4
                }
                Err(e) => fail(format!("interface {}, {}", iface, e)),
            }
        }
    };
    debug!("local ips: {:?}", local_ips);

    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(timeout))
        .with_max_retry(max_retry);

    match probe_nat(server, &local_ips, config).await {
        Ok(report) => print!("{}", report),
        Err(e) => fail(format!("{}", e)),
    }
}
