//! Connectivity gate.
//!
//! Before every fetch a paginated resource asks [`ConnectivityGate`] whether
//! the active network can carry traffic.  The gate itself is a pure
//! predicate; where the capabilities come from is behind [`NetworkMonitor`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Transport a network interface is able to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
    Bluetooth,
    Vpn,
    Loopback,
}

/// Capabilities reported for the active network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCapabilities {
    transports: BTreeSet<Transport>,
}

impl NetworkCapabilities {
    pub fn new(transports: impl IntoIterator<Item = Transport>) -> Self {
        Self {
            transports: transports.into_iter().collect(),
        }
    }

    pub fn has_transport(&self, transport: Transport) -> bool {
        self.transports.contains(&transport)
    }

    pub fn insert(&mut self, transport: Transport) {
        self.transports.insert(transport);
    }
}

/// Anything that can describe the currently active network.
pub trait NetworkMonitor: Send + Sync {
    /// `None` when there is no active network at all.
    fn active_network(&self) -> Option<NetworkCapabilities>;
}

/// Connectivity predicate, evaluated fresh on every call.
#[derive(Clone)]
pub struct ConnectivityGate {
    monitor: Arc<dyn NetworkMonitor>,
}

impl ConnectivityGate {
    pub fn new(monitor: Arc<dyn NetworkMonitor>) -> Self {
        Self { monitor }
    }

    /// True iff the active network has WiFi, cellular or ethernet transport.
    pub fn is_connected(&self) -> bool {
        self.monitor
            .active_network()
            .map(|caps| {
                caps.has_transport(Transport::Wifi)
                    || caps.has_transport(Transport::Cellular)
                    || caps.has_transport(Transport::Ethernet)
            })
            .unwrap_or(false)
    }
}

/// Fixed answer, for tests and forced-offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticMonitor(pub Option<NetworkCapabilities>);

impl StaticMonitor {
    pub fn online() -> Self {
        Self(Some(NetworkCapabilities::new([Transport::Ethernet])))
    }

    pub fn offline() -> Self {
        Self(None)
    }
}

impl NetworkMonitor for StaticMonitor {
    fn active_network(&self) -> Option<NetworkCapabilities> {
        self.0.clone()
    }
}

/// Linux monitor reading `/sys/class/net`.
///
/// Every interface whose `operstate` is `up` contributes its transport; the
/// union is reported as the active network.
#[derive(Debug, Clone)]
pub struct SysfsMonitor {
    root: PathBuf,
}

impl SysfsMonitor {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn classify(iface: &Path) -> Option<Transport> {
        let name = iface.file_name()?.to_string_lossy();

        if name == "lo" {
            return Some(Transport::Loopback);
        }
        if iface.join("wireless").exists() || iface.join("phy80211").exists() {
            return Some(Transport::Wifi);
        }
        if name.starts_with("wwan") || name.starts_with("rmnet") {
            return Some(Transport::Cellular);
        }
        if name.starts_with("bnep") {
            return Some(Transport::Bluetooth);
        }
        if name.starts_with("tun") || name.starts_with("wg") {
            return Some(Transport::Vpn);
        }
        // ARPHRD_ETHER
        match fs::read_to_string(iface.join("type")) {
            Ok(t) if t.trim() == "1" => Some(Transport::Ethernet),
            _ => None,
        }
    }

    fn is_up(iface: &Path) -> bool {
        fs::read_to_string(iface.join("operstate"))
            .map(|s| s.trim() == "up")
            .unwrap_or(false)
    }
}

impl Default for SysfsMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkMonitor for SysfsMonitor {
    fn active_network(&self) -> Option<NetworkCapabilities> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("cannot read {:?}: {}", self.root, e);
                return None;
            }
        };

        let mut caps = NetworkCapabilities::default();
        let mut any_up = false;
        for entry in entries.flatten() {
            let path = entry.path();
            if !Self::is_up(&path) {
                continue;
            }
            any_up = true;
            if let Some(transport) = Self::classify(&path) {
                caps.insert(transport);
            }
        }

        any_up.then_some(caps)
    }
}
