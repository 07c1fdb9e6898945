//! # Network Probe
//!
//! File: cli/src/common/network/probe.rs
//!
//! ## Overview
//!
//! Bridge networking gives each project its own `192.168.<index>.0/24`
//! network. Before picking an index we probe the address the playbooks will
//! assign to the web container (`192.168.<index>.10`); if something answers
//! there, the range is taken. Localhost networking instead needs the HTTP port
//! on `127.0.0.1` to be free.
//!
//! Both checks are best-effort: another process can claim the range or port
//! between the probe and the playbook run.
//!
//! ## Architecture
//!
//! - `Probe`: trait answering "does `addr` accept a TCP connection within `timeout`?".
//! - `TcpProbe`: the real implementation using `TcpStream::connect_timeout`.
//! - `select_free_network_index`: sequential scan over `2..=255`.
//! - `ensure_local_port_free`: fails with `PortUnavailable` when the port answers.
//!
use crate::core::error::{DockerizerError, Result};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Candidate network indices, inclusive.
pub const NETWORK_INDEX_RANGE: RangeInclusive<u8> = 2..=255;
/// Index used when every candidate answers.
pub const FALLBACK_NETWORK_INDEX: u8 = 2;

/// A reachability check for a single socket address.
pub trait Probe {
    fn is_reachable(&self, addr: SocketAddr) -> bool;
}

/// Probes by opening a TCP connection with a bounded timeout.
#[derive(Debug, Clone, Copy)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Probe for TcpProbe {
    fn is_reachable(&self, addr: SocketAddr) -> bool {
        is_reachable(addr, self.timeout)
    }
}

/// Returns whether `addr` accepts a TCP connection within `timeout`.
///
/// Refusals, timeouts and routing errors all yield `false`. The stream, when
/// one is opened, is dropped before returning.
///
/// # Arguments
///
/// * `addr` - The address to connect to
/// * `timeout` - Upper bound on the connect attempt
///
/// # Returns
///
/// * `bool` - `true` only if the connection was accepted
pub fn is_reachable(addr: SocketAddr, timeout: Duration) -> bool {
    match TcpStream::connect_timeout(&addr, timeout) {
        Ok(stream) => {
            drop(stream);
            debug!("Probe {} -> reachable", addr);
            true
        }
        Err(e) => {
            debug!("Probe {} -> unreachable ({})", addr, e);
            false
        }
    }
}

/// Address probed for a candidate network index.
pub fn probe_address(index: u8, port: u16) -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(192, 168, index, 10), port))
}

/// Host-side gateway of a bridge network, used as the debugger callback address.
pub fn gateway_address(index: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, index, 1)
}

/// Picks the first network index in `2..=255` whose probe address does not answer.
///
/// Falls back to index 2 with a warning if every candidate answers.
///
/// # Arguments
///
/// * `probe` - Connectivity check used for each candidate `192.168.<index>.10`
/// * `port` - The HTTP port the containers will publish
///
/// # Returns
///
/// * `u8` - The third octet of the bridge subnet to use
pub fn select_free_network_index(probe: &dyn Probe, port: u16) -> u8 {
    // Candidates are tried in ascending order; the first silent one wins.
    for index in NETWORK_INDEX_RANGE {
        let addr = probe_address(index, port);
        if !probe.is_reachable(addr) {
            info!("Selected free network index {} ({} is unused)", index, addr);
            return index;
        }
    }
    warn!(
        "Every private network 192.168.2-255.0/24 answered on port {}; falling back to index {}.",
        port, FALLBACK_NETWORK_INDEX
    );
    FALLBACK_NETWORK_INDEX
}

/// Checks that nothing listens on `127.0.0.1:port`.
///
/// # Arguments
///
/// * `probe` - Connectivity check
/// * `port` - The HTTP port localhost mode will bind
///
/// # Errors
///
/// Returns an `Err` (`PortUnavailable`) if the port accepts a connection.
pub fn ensure_local_port_free(probe: &dyn Probe, port: u16) -> Result<()> {
    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));
    if probe.is_reachable(addr) {
        anyhow::bail!(DockerizerError::PortUnavailable { port });
    }
    info!("Port {} is free", port);
    Ok(())
}
