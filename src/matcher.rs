//! Per-family subnet matchers.

use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

use crate::trie::PrefixTrie;

/// IP address family a [`Matcher`] is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// 32-bit IPv4 addresses
    V4,
    /// 128-bit IPv6 addresses
    V6,
}

impl Family {
    /// Address length in bits.
    pub const fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Address length in bytes.
    pub const fn byte_len(self) -> usize {
        match self {
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }

    /// Family of an address.
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Family::V4 => "IPv4",
            Family::V6 => "IPv6",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Matcher tests addresses of one family against a set of subnets.
///
/// Input of the wrong shape (an address with the wrong byte length, a prefix
/// longer than the family allows, a network of the other family) is ignored:
/// inserts become no-ops and lookups return `false`.
///
/// # Examples
/// ```
/// use ipnet::IpNet;
/// use subnets::Matcher;
///
/// let mut matcher = Matcher::v4();
/// matcher.add(&[10, 0, 0, 0], 8);
/// let private: IpNet = "192.168.0.0/16".parse().unwrap();
/// matcher.add_net(&private);
///
/// assert!(matcher.matches(&[10, 9, 8, 7]));
/// assert!(matcher.matches(&[192, 168, 0, 1]));
/// assert!(!matcher.matches(&[8, 8, 8, 8]));
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
    family: Family,
    trie: PrefixTrie,
}

impl Matcher {
    /// Create an empty matcher for the given family.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            trie: PrefixTrie::new(family.bits() as usize),
        }
    }

    /// Create an empty IPv4 matcher.
    pub fn v4() -> Self {
        Self::new(Family::V4)
    }

    /// Create an empty IPv6 matcher.
    pub fn v6() -> Self {
        Self::new(Family::V6)
    }

    /// Get the family of this matcher.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Number of trie nodes currently allocated.
    pub fn node_count(&self) -> usize {
        self.trie.node_count()
    }

    /// Whether every address of the family matches.
    pub fn is_full(&self) -> bool {
        self.trie.is_full()
    }

    /// Check whether `address` is inside one of the subnets.
    ///
    /// Returns `false` if `address` is not exactly
    /// [`Family::byte_len`] bytes long.
    pub fn matches(&self, address: &[u8]) -> bool {
        if address.len() != self.family.byte_len() {
            return false;
        }
        self.trie.matches(address)
    }

    /// Check whether an IP address is inside one of the subnets.
    ///
    /// Addresses of the other family never match.
    pub fn matches_ip(&self, ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => self.matches(&v4.octets()),
            IpAddr::V6(v6) => self.matches(&v6.octets()),
        }
    }

    /// Add the subnet with network `address` and prefix length `prefix_len`.
    ///
    /// Bits of `address` past `prefix_len` are ignored. Does nothing if the
    /// address has the wrong byte length or `prefix_len` exceeds the
    /// family's bit length.
    pub fn add(&mut self, address: &[u8], prefix_len: u8) {
        if address.len() != self.family.byte_len() || prefix_len > self.family.bits() {
            return;
        }
        self.trie.add(address, prefix_len as usize);
    }

    /// Add a parsed network.
    ///
    /// Accepts `&IpNet` or `Option<&IpNet>`; `None` and networks of the
    /// other family are ignored.
    ///
    /// ```
    /// use ipnet::IpNet;
    /// use subnets::Matcher;
    ///
    /// let mut matcher = Matcher::v6();
    /// let net: IpNet = "2001:db8::/32".parse().unwrap();
    /// matcher.add_net(&net);
    /// matcher.add_net(None);
    /// let other: IpNet = "10.0.0.0/8".parse().unwrap();
    /// matcher.add_net(&other); // ignored
    ///
    /// assert!(matcher.matches_ip("2001:db8::1".parse().unwrap()));
    /// assert!(!matcher.matches_ip("10.0.0.1".parse().unwrap()));
    /// ```
    pub fn add_net<'a>(&mut self, net: impl Into<Option<&'a IpNet>>) {
        let Some(net) = net.into() else {
            return;
        };
        if net.max_prefix_len() != self.family.bits() {
            return;
        }
        match net.network() {
            IpAddr::V4(v4) => self.add(&v4.octets(), net.prefix_len()),
            IpAddr::V6(v6) => self.add(&v6.octets(), net.prefix_len()),
        }
    }
}

impl Extend<IpNet> for Matcher {
    fn extend<I: IntoIterator<Item = IpNet>>(&mut self, iter: I) {
        for net in iter {
            self.add_net(&net);
        }
    }
}
