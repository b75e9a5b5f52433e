//! Subnet list loading.
//!
//! Lists are plain text, one CIDR per line:
//!
//! ```text
//! # China mainland routes
//! 1.0.1.0/24
//! 1.0.2.0/23
//! 2001:250::/35    # CERNET
//! ```
//!
//! `#` starts a comment and blank lines are ignored. Files ending in `.gz`
//! are decompressed transparently.

use flate2::read::GzDecoder;
use ipnet::IpNet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::net::IpAddr;
use std::path::Path;

use crate::error::{Error, Result};
use crate::set::SubnetSet;

/// Configuration for parsing subnet lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadConfig {
    /// Fail on the first malformed line instead of skipping it.
    pub strict: bool,
    /// Accept bare addresses as /32 or /128 host routes.
    pub allow_host_addresses: bool,
}

impl LoadConfig {
    /// Create a config that fails on malformed lines.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Accept bare addresses as host routes.
    pub fn with_host_addresses(mut self, allow: bool) -> Self {
        self.allow_host_addresses = allow;
        self
    }
}

/// Summary of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// IPv4 networks inserted
    pub v4: usize,
    /// IPv6 networks inserted
    pub v6: usize,
    /// Malformed lines skipped
    pub skipped: usize,
}

impl LoadReport {
    /// Total networks inserted.
    pub fn total(&self) -> usize {
        self.v4 + self.v6
    }

    /// Accumulate another report into this one.
    pub fn merge(&mut self, other: LoadReport) {
        self.v4 += other.v4;
        self.v6 += other.v6;
        self.skipped += other.skipped;
    }
}

/// Parse one line of a subnet list.
///
/// Returns `Ok(None)` for blank and comment-only lines. Host bits past the
/// prefix are cleared, so `10.1.2.3/8` yields `10.0.0.0/8`.
///
/// # Examples
/// ```
/// use subnets::{parse_line, LoadConfig};
///
/// let config = LoadConfig::default();
/// let net = parse_line("  172.16.0.0/12  # private", &config).unwrap();
/// assert_eq!(net.unwrap().to_string(), "172.16.0.0/12");
/// assert!(parse_line("# comment", &config).unwrap().is_none());
/// assert!(parse_line("172.16.0.0/33", &config).is_err());
/// ```
pub fn parse_line(line: &str, config: &LoadConfig) -> Result<Option<IpNet>> {
    let pattern = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let pattern = pattern.trim();

    if pattern.is_empty() {
        return Ok(None);
    }

    if let Ok(net) = pattern.parse::<IpNet>() {
        return Ok(Some(net.trunc()));
    }

    if config.allow_host_addresses {
        if let Ok(ip) = pattern.parse::<IpAddr>() {
            let prefix_len = match ip {
                IpAddr::V4(_) => 32,
                IpAddr::V6(_) => 128,
            };
            return IpNet::new(ip, prefix_len)
                .map(Some)
                .map_err(|_| Error::InvalidCidr(pattern.to_string()));
        }
    }

    Err(Error::InvalidCidr(pattern.to_string()))
}

/// Read a subnet list from `reader` into `set`.
pub fn load_reader<R: Read>(
    set: &mut SubnetSet,
    reader: R,
    config: &LoadConfig,
) -> Result<LoadReport> {
    let buf_reader = BufReader::new(reader);
    let mut report = LoadReport::default();

    for (idx, line) in buf_reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line, config) {
            Ok(Some(net)) => {
                match net {
                    IpNet::V4(_) => report.v4 += 1,
                    IpNet::V6(_) => report.v6 += 1,
                }
                set.insert(net);
            }
            Ok(None) => {}
            Err(Error::InvalidCidr(pattern)) if config.strict => {
                return Err(Error::InvalidLine {
                    line: idx + 1,
                    pattern,
                });
            }
            Err(e) => {
                log::warn!("Skipping line {}: {}", idx + 1, e);
                report.skipped += 1;
            }
        }
    }

    log::debug!(
        "Loaded {} IPv4 and {} IPv6 networks ({} skipped)",
        report.v4,
        report.v6,
        report.skipped
    );

    Ok(report)
}

/// Read a subnet list from a string.
pub fn load_str(set: &mut SubnetSet, text: &str, config: &LoadConfig) -> Result<LoadReport> {
    load_reader(set, text.as_bytes(), config)
}

/// Read a subnet list file, gunzipping it if the name ends in `.gz`.
pub fn load_path(set: &mut SubnetSet, path: &Path, config: &LoadConfig) -> Result<LoadReport> {
    let file = File::open(path)?;
    let gzipped = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let report = if gzipped {
        load_reader(set, GzDecoder::new(file), config)?
    } else {
        load_reader(set, file, config)?
    };

    log::info!("Loaded {} networks from {:?}", report.total(), path);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const SAMPLE: &str = "\
# private ranges
10.0.0.0/8
172.16.0.0/12   # rfc1918

192.168.0.0/16
fc00::/7
";

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_line_variants() {
        let config = LoadConfig::default();
        assert!(parse_line("", &config).unwrap().is_none());
        assert!(parse_line("   ", &config).unwrap().is_none());
        assert!(parse_line("#10.0.0.0/8", &config).unwrap().is_none());
        assert_eq!(
            parse_line("10.20.30.40/8", &config).unwrap(),
            Some("10.0.0.0/8".parse().unwrap())
        );
        assert_eq!(
            parse_line("2001:db8::1/32", &config).unwrap(),
            Some("2001:db8::/32".parse().unwrap())
        );
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        let config = LoadConfig::default();
        assert!(parse_line("invalid", &config).is_err());
        assert!(parse_line("10.0.0.0/33", &config).is_err());
        assert!(parse_line("::/129", &config).is_err());
        // No prefix length
        assert!(parse_line("192.168.1.1", &config).is_err());
    }

    #[test]
    fn test_parse_line_host_addresses() {
        let config = LoadConfig::default().with_host_addresses(true);
        assert_eq!(
            parse_line("192.168.1.1", &config).unwrap(),
            Some("192.168.1.1/32".parse().unwrap())
        );
        assert_eq!(
            parse_line("::1", &config).unwrap(),
            Some("::1/128".parse().unwrap())
        );
    }

    #[test]
    fn test_load_str() {
        let mut set = SubnetSet::new();
        let report = load_str(&mut set, SAMPLE, &LoadConfig::default()).unwrap();

        assert_eq!(report, LoadReport { v4: 3, v6: 1, skipped: 0 });
        assert!(set.contains(ip("172.23.34.45")));
        assert!(set.contains(ip("fd12::1")));
        assert!(!set.contains(ip("8.8.8.8")));
    }

    #[test]
    fn test_lenient_skips_bad_lines() {
        let mut set = SubnetSet::new();
        let text = "10.0.0.0/8\nnot-a-cidr\n1.2.3.4/40\n192.168.0.0/16\n";
        let report = load_str(&mut set, text, &LoadConfig::default()).unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.skipped, 2);
        assert!(set.contains(ip("192.168.3.4")));
    }

    #[test]
    fn test_strict_reports_line_number() {
        let mut set = SubnetSet::new();
        let text = "10.0.0.0/8\n\n# comment\nnot-a-cidr\n";
        let err = load_str(&mut set, text, &LoadConfig::strict()).unwrap_err();

        match err {
            Error::InvalidLine { line, pattern } => {
                assert_eq!(line, 4);
                assert_eq!(pattern, "not-a-cidr");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_path_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("routes.txt");
        std::fs::write(&plain, SAMPLE).unwrap();

        let gz = dir.path().join("routes-v6.txt.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"2001:db8::/32\n").unwrap();
        std::fs::write(&gz, encoder.finish().unwrap()).unwrap();

        let mut set = SubnetSet::new();
        let mut report = load_path(&mut set, &plain, &LoadConfig::default()).unwrap();
        report.merge(load_path(&mut set, &gz, &LoadConfig::default()).unwrap());

        assert_eq!(report, LoadReport { v4: 3, v6: 2, skipped: 0 });
        assert!(set.contains(ip("10.1.1.1")));
        assert!(set.contains(ip("2001:db8:1::1")));
    }

    #[test]
    fn test_load_path_missing_file() {
        let mut set = SubnetSet::new();
        let err = load_path(&mut set, Path::new("/nonexistent/routes.txt"), &LoadConfig::default());
        assert!(matches!(err, Err(Error::Io(_))));
    }
}
