//! subnet-match: CLI tool for classifying IP addresses against subnet lists.

use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use subnets::{load_path, Error, Family, LoadConfig, LoadReport, Result, SubnetSet};

#[derive(Parser)]
#[command(name = "subnet-match")]
#[command(version)]
#[command(about = "Check IP addresses against CIDR subnet lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether each address falls inside the loaded subnets
    Check {
        #[command(flatten)]
        lists: ListArgs,

        /// Print only matching addresses
        #[arg(long)]
        only_matches: bool,

        /// Match ::ffff:a.b.c.d against IPv4 subnets
        #[arg(long)]
        ipv4_mapped: bool,

        /// Addresses to check (read from stdin when omitted)
        addresses: Vec<String>,
    },

    /// Print statistics about the loaded subnets
    Stats {
        #[command(flatten)]
        lists: ListArgs,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Subnet list file, one CIDR per line (.gz accepted)
    #[arg(short, long = "subnets", required = true)]
    subnets: Vec<PathBuf>,

    /// Fail on malformed lines instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Accept bare addresses as host routes
    #[arg(long)]
    hosts: bool,
}

impl ListArgs {
    fn config(&self) -> LoadConfig {
        LoadConfig {
            strict: self.strict,
            allow_host_addresses: self.hosts,
        }
    }

    fn load(&self) -> Result<(SubnetSet, LoadReport)> {
        let config = self.config();
        let mut set = SubnetSet::new();
        let mut report = LoadReport::default();
        for path in &self.subnets {
            report.merge(load_path(&mut set, path, &config)?);
        }
        Ok((set, report))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            lists,
            only_matches,
            ipv4_mapped,
            addresses,
        } => check(&lists, only_matches, ipv4_mapped, addresses),
        Commands::Stats { lists } => stats(&lists),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check(
    lists: &ListArgs,
    only_matches: bool,
    ipv4_mapped: bool,
    addresses: Vec<String>,
) -> Result<()> {
    let (set, _) = lists.load()?;
    let set = set.with_ipv4_mapped(ipv4_mapped);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut errors = stderr.lock();

    if addresses.is_empty() {
        classify(&set, io::stdin().lock(), only_matches, &mut out, &mut errors)
    } else {
        let joined = addresses.join("\n");
        classify(&set, joined.as_bytes(), only_matches, &mut out, &mut errors)
    }
}

/// Classify one address per input line.
///
/// Writes `<addr>\t<match|miss>` (or just matching addresses with
/// `only_matches`) to `out`. Lines that are not addresses, including lines
/// that are not valid UTF-8, are reported to `errors` and skipped.
fn classify<R: BufRead, W: Write, E: Write>(
    set: &SubnetSet,
    mut input: R,
    only_matches: bool,
    out: &mut W,
    errors: &mut E,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }

        let ip: IpAddr = match raw.parse() {
            Ok(ip) => ip,
            Err(_) => {
                writeln!(errors, "{}", Error::InvalidAddress(raw.to_string()))?;
                continue;
            }
        };

        let matched = set.contains(ip);
        if only_matches {
            if matched {
                writeln!(out, "{}", ip)?;
            }
        } else {
            writeln!(out, "{}\t{}", ip, if matched { "match" } else { "miss" })?;
        }
    }

    Ok(())
}

fn stats(lists: &ListArgs) -> Result<()> {
    let (set, report) = lists.load()?;

    println!("networks:      {}", report.total());
    println!("  IPv4:        {}", report.v4);
    println!("  IPv6:        {}", report.v6);
    println!("skipped lines: {}", report.skipped);
    for family in [Family::V4, Family::V6] {
        let matcher = set.matcher(family);
        println!(
            "{} trie:     {} nodes{}",
            family,
            matcher.node_count(),
            if matcher.is_full() { " (covers all addresses)" } else { "" }
        );
    }

    Ok(())
}
