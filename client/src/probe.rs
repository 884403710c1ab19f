use log::{debug, info};
use std::net::IpAddr;
use stun_nat::client::{ClientConfig, UdpDialer};
use stun_nat::diagnosis::{Diagnosis, NatReport};
use stun_nat::error::Error;
use stun_nat::url::StunUrl;

pub async fn probe_nat(
    server: StunUrl,
    local_ips: &[IpAddr],
    config: ClientConfig,
) -> Result<NatReport, Error> {
    debug!("target: {}", server);
    debug!("local ips: {:?}", local_ips);

    let mut diagnosis = Diagnosis::new(UdpDialer::new(config), server);

    match diagnosis.run(local_ips).await {
        Ok(v) => {
            info!("mapping: {}, filtering: {}", v.mapping, v.filtering);
            if let Some(mapped) = v.first.mapped {
                debug!("mapped_address: {}", mapped);
            }
            Ok(v)
        }
        Err(e) => {
            debug!("probe_nat stopped in state: {:?}", diagnosis.state());
            Err(e)
        }
    }
}
