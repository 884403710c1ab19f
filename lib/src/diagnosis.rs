//! Two-probe NAT mapping diagnosis.
//!
//! Two binding requests are sent to the same server from the same local IP,
//! each through a freshly dialed transport. If the first reflexive IP is one
//! of our own addresses there is no NAT. Otherwise equal reflexive IPs mean
//! endpoint-independent mapping. Filtering needs probes against alternate
//! server endpoints and is always reported as undetermined.

use crate::client::{Dialer, Transport};
use crate::constants::*;
use crate::error::{Error, Result};
use crate::message::Message;
use crate::url::StunUrl;
use log::{debug, info, warn};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisState {
    Init,
    Probe1Sent,
    Probe1Received,
    Probe2Sent,
    Probe2Received,
    NoNat,
    Classified,
    Failed(Error),
}

impl DiagnosisState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DiagnosisState::NoNat | DiagnosisState::Classified | DiagnosisState::Failed(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingBehavior {
    NoNat,
    EndpointIndependent,

    // 两次的地址不同, 需要更多的探测
    Unclassified,
}

impl fmt::Display for MappingBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingBehavior::NoNat => f.write_str("no NAT"),
            MappingBehavior::EndpointIndependent => {
                f.write_str("Endpoint-Independent Mapping (EIM)")
            }
            MappingBehavior::Unclassified => f.write_str("could not determine"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteringBehavior {
    NotApplicable,
    Undetermined,
}

impl fmt::Display for FilteringBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilteringBehavior::NotApplicable => f.write_str("not applicable"),
            FilteringBehavior::Undetermined => f.write_str("could not determine"),
        }
    }
}

/// Addresses reported by one binding response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub reflexive: SocketAddr,
    pub mapped: Option<SocketAddr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatReport {
    pub server: StunUrl,
    pub local: IpAddr,
    pub first: Probe,
    pub second: Option<Probe>,
    pub mapping: MappingBehavior,
    pub filtering: FilteringBehavior,
}

impl fmt::Display for NatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "STUN server: {}", self.server)?;
        writeln!(f, "local address: {}", self.local)?;
        writeln!(f, "reflexive address (1st): {}", self.first.reflexive)?;
        if let Some(second) = &self.second {
            writeln!(f, "reflexive address (2nd): {}", second.reflexive)?;
        }

        if self.mapping == MappingBehavior::NoNat {
            return writeln!(f, "There is no NAT");
        }
        writeln!(f, "NAT Mapping Type: {}", self.mapping)?;
        writeln!(f, "NAT Filtering Type: {}", self.filtering)
    }
}

pub struct Diagnosis<D> {
    dialer: D,
    server: StunUrl,
    state: DiagnosisState,
    log_target: String,
}

impl<D: Dialer> Diagnosis<D> {
    pub fn new(dialer: D, server: StunUrl) -> Self {
        Self {
            dialer,
            server,
            state: DiagnosisState::Init,
            log_target: "stun_nat::diagnosis".to_string(),
        }
    }

    pub fn with_log_target(mut self, log_target: &str) -> Self {
        self.log_target = log_target.to_string();
        self
    }

    pub fn state(&self) -> &DiagnosisState {
        &self.state
    }

    fn transition(&mut self, state: DiagnosisState) {
        debug!(target: self.log_target.as_str(), "{:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Runs both probes from the first IPv4 address in `local_addrs`.
    ///
    /// All of `local_addrs` are compared with the first reflexive address.
    /// The first error ends the run and leaves the engine in
    /// [`DiagnosisState::Failed`].
    pub async fn run(&mut self, local_addrs: &[IpAddr]) -> Result<NatReport> {
        self.state = DiagnosisState::Init;

        match self.diagnose(local_addrs).await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.transition(DiagnosisState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    async fn diagnose(&mut self, local_addrs: &[IpAddr]) -> Result<NatReport> {
        let local = local_addrs
            .iter()
            .copied()
            .find(IpAddr::is_ipv4)
            .ok_or(Error::NoLocalAddress)?;
        info!(target: self.log_target.as_str(), "using local ip: {}", local);

        self.transition(DiagnosisState::Probe1Sent);
        let first = self.probe(local).await?;
        self.transition(DiagnosisState::Probe1Received);
        info!(
            target: self.log_target.as_str(),
            "reflexive address (1st): {}",
            first.reflexive
        );

        if local_addrs.contains(&first.reflexive.ip()) {
            self.transition(DiagnosisState::NoNat);
            return Ok(NatReport {
                server: self.server.clone(),
                local,
                first,
                second: None,
                mapping: MappingBehavior::NoNat,
                filtering: FilteringBehavior::NotApplicable,
            });
        }

        self.transition(DiagnosisState::Probe2Sent);
        let second = self.probe(local).await?;
        self.transition(DiagnosisState::Probe2Received);
        info!(
            target: self.log_target.as_str(),
            "reflexive address (2nd): {}",
            second.reflexive
        );

        // 每次都是新的本地端口, 只比较ip
        let mapping = if first.reflexive.ip() == second.reflexive.ip() {
            MappingBehavior::EndpointIndependent
        } else {
            MappingBehavior::Unclassified
        };
        self.transition(DiagnosisState::Classified);

        Ok(NatReport {
            server: self.server.clone(),
            local,
            first,
            second: Some(second),
            mapping,
            filtering: FilteringBehavior::Undetermined,
        })
    }

    async fn probe(&self, local: IpAddr) -> Result<Probe> {
        let mut transport = self.dialer.dial(&self.server, local).await?;
        let result = transport.request(&Message::binding_request()).await;
        transport.close();

        self.read_probe(&result?)
    }

    fn read_probe(&self, response: &Message) -> Result<Probe> {
        match response.msg_type() {
            MESSAGE_TYPE_BIND_RES => {}
            MESSAGE_TYPE_BIND_ERR_RES => {
                let attr = response
                    .error_code()
                    .ok_or(Error::MissingAttribute(ATTR_ERROR_CODE))??;
                return Err(Error::ErrorResponse {
                    code: attr.code,
                    reason: attr.msg,
                });
            }
            v => {
                return Err(Error::UnexpectedResponse(format!(
                    "message type: {:#06x}",
                    v
                )))
            }
        }

        let reflexive = response.xor_mapped_address()?.address;

        let mapped = match response.mapped_address() {
            Some(Ok(v)) => Some(v),
            Some(Err(e)) => {
                warn!(target: self.log_target.as_str(), "bad MAPPED-ADDRESS, {}", e);
                None
            }
            None => None,
        };

        Ok(Probe { reflexive, mapped })
    }
}
