//! Client address allow-listing.
//!
//! A coarse location gate in front of face verification. Entries are CIDR
//! blocks or single addresses. An empty policy admits everyone and loopback
//! clients are always admitted.

use std::net::IpAddr;

use ipnet::IpNet;

/// Parses a CIDR block or a single address into a network.
///
/// # Errors
///
/// Returns the parse error of the CIDR form when neither form parses.
pub fn parse_network(entry: &str) -> Result<IpNet, ipnet::AddrParseError> {
    let entry = entry.trim();
    match entry.parse::<IpNet>() {
        Ok(net) => Ok(net),
        Err(err) => entry.parse::<IpAddr>().map(IpNet::from).map_err(|_| err),
    }
}

/// Unwraps IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`).
#[must_use]
pub fn normalize(ip: IpAddr) -> IpAddr {
    ip.to_canonical()
}

/// An allow-list of networks.
#[derive(Debug, Clone, Default)]
pub struct NetworkPolicy {
    networks: Vec<IpNet>,
}

impl NetworkPolicy {
    /// Builds a policy from raw entries. Returns the entries that failed to
    /// parse alongside the policy so the caller can report them.
    pub fn from_entries<I, S>(entries: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut networks = Vec::new();
        let mut rejected = Vec::new();
        for entry in entries {
            let entry = entry.as_ref();
            if entry.trim().is_empty() {
                continue;
            }
            match parse_network(entry) {
                Ok(net) => networks.push(net),
                Err(_) => rejected.push(entry.to_string()),
            }
        }
        (Self { networks }, rejected)
    }

    /// A policy admitting only `network`.
    #[must_use]
    pub fn single(network: IpNet) -> Self {
        Self {
            networks: vec![network],
        }
    }

    /// True when no networks are configured.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.networks.is_empty()
    }

    /// Whether a client at `ip` is admitted. An unknown address is only
    /// admitted by an unrestricted policy.
    #[must_use]
    pub fn allows(&self, ip: Option<IpAddr>) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        let Some(ip) = ip.map(normalize) else {
            return false;
        };
        ip.is_loopback() || self.networks.iter().any(|net| net.contains(&ip))
    }

    /// The configured networks in display form.
    #[must_use]
    pub fn networks(&self) -> Vec<String> {
        self.networks.iter().map(ToString::to_string).collect()
    }
}
