use log::debug;
use std::net::IpAddr;

/// Non-loopback addresses of `iface`, split into (ipv4, ipv6).
pub fn addrs_of(iface: &str) -> Result<(Vec<IpAddr>, Vec<IpAddr>), String> {
    let netifas = local_ip_address::list_afinet_netifas().map_err(|e| format!("{}", e))?;
    Ok(filter_iface(netifas, iface))
}

fn filter_iface(netifas: Vec<(String, IpAddr)>, iface: &str) -> (Vec<IpAddr>, Vec<IpAddr>) {
    let mut ip4 = vec![];
    let mut ip6 = vec![];

    for (name, ip) in netifas {
        if name != iface || ip.is_loopback() {
            continue;
        }

        debug!("found {} in interface {}", ip, iface);
        match ip {
            IpAddr::V4(_) => ip4.push(ip),
            IpAddr::V6(_) => ip6.push(ip),
        }
    }

    (ip4, ip6)
}
