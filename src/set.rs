//! Dual-family subnet set.

use ipnet::IpNet;
use std::net::IpAddr;

use crate::matcher::{Family, Matcher};

/// SubnetSet holds IPv4 and IPv6 subnets side by side and dispatches each
/// lookup to the matcher of the address's family.
///
/// # Examples
/// ```
/// use ipnet::IpNet;
/// use subnets::SubnetSet;
///
/// let nets: Vec<IpNet> = ["10.0.0.0/8", "fc00::/7"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let set: SubnetSet = nets.into_iter().collect();
///
/// assert!(set.contains("10.1.2.3".parse().unwrap()));
/// assert!(set.contains("fd00::1".parse().unwrap()));
/// assert!(!set.contains("8.8.8.8".parse().unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct SubnetSet {
    v4: Matcher,
    v6: Matcher,
    /// Look up `::ffff:a.b.c.d` in the IPv4 matcher.
    map_ipv4_mapped: bool,
}

impl SubnetSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            v4: Matcher::v4(),
            v6: Matcher::v6(),
            map_ipv4_mapped: false,
        }
    }

    /// Treat IPv4-mapped IPv6 addresses as their IPv4 equivalents on lookup.
    pub fn with_ipv4_mapped(mut self, enabled: bool) -> Self {
        self.map_ipv4_mapped = enabled;
        self
    }

    /// Get the IPv4 matcher.
    pub fn v4(&self) -> &Matcher {
        &self.v4
    }

    /// Get the IPv6 matcher.
    pub fn v6(&self) -> &Matcher {
        &self.v6
    }

    /// Get the matcher for a family.
    pub fn matcher(&self, family: Family) -> &Matcher {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }

    /// Total trie nodes across both families.
    pub fn node_count(&self) -> usize {
        self.v4.node_count() + self.v6.node_count()
    }

    /// Add a network to the matcher of its family.
    pub fn insert(&mut self, net: IpNet) {
        match net {
            IpNet::V4(_) => self.v4.add_net(&net),
            IpNet::V6(_) => self.v6.add_net(&net),
        }
    }

    /// Add a single address as a host route.
    pub fn insert_addr(&mut self, ip: IpAddr) {
        match ip {
            IpAddr::V4(v4) => self.v4.add(&v4.octets(), Family::V4.bits()),
            IpAddr::V6(v6) => self.v6.add(&v6.octets(), Family::V6.bits()),
        }
    }

    /// Check whether an address is inside any subnet of its family.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => self.v4.matches(&v4.octets()),
            IpAddr::V6(v6) => {
                if self.map_ipv4_mapped {
                    if let Some(v4) = v6.to_ipv4_mapped() {
                        return self.v4.matches(&v4.octets());
                    }
                }
                self.v6.matches(&v6.octets())
            }
        }
    }
}

impl Default for SubnetSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<IpNet> for SubnetSet {
    fn extend<I: IntoIterator<Item = IpNet>>(&mut self, iter: I) {
        for net in iter {
            self.insert(net);
        }
    }
}

impl FromIterator<IpNet> for SubnetSet {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
