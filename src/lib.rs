//! Subnets - fast IP subnet membership matching.
//!
//! This crate answers one question, cheaply and repeatedly: does this IP
//! address fall inside any subnet of a given set? It is meant for
//! high-volume classification such as geo-IP filtering or routing policy,
//! where millions of lookups run against large subnet lists.
//!
//! # Features
//!
//! - **Compact trie**: sibling subnets that tile a range merge into one node
//!   as they are inserted, so covering large ranges stays cheap
//! - **Allocation-free lookups**: a match is a bounded walk of at most 32 or
//!   128 steps
//! - **IPv4 and IPv6**: one trie type bound to the family's bit length
//! - **Subnet list loading**: text and gzip lists with comments
//!
//! # Quick Start
//!
//! ```
//! use subnets::{load_str, LoadConfig, SubnetSet};
//!
//! let mut set = SubnetSet::new();
//! load_str(
//!     &mut set,
//!     "10.0.0.0/8\n172.16.0.0/12\n192.168.0.0/16\n",
//!     &LoadConfig::default(),
//! )?;
//!
//! assert!(set.contains("192.168.0.1".parse().unwrap()));
//! assert!(!set.contains("8.8.8.8".parse().unwrap()));
//! # Ok::<(), subnets::Error>(())
//! ```
//!
//! # Concurrency
//!
//! Insertion takes `&mut self` and lookups take `&self`. Build a set first,
//! then share it (for example behind an `Arc`) for any number of readers;
//! interleaving writers with readers needs an external lock.

mod bits;
mod error;
mod loader;
mod matcher;
mod set;
mod trie;

#[cfg(test)]
mod proptests;

// Re-export core types
pub use bits::BitView;
pub use error::{Error, Result};
pub use matcher::{Family, Matcher};
pub use set::SubnetSet;
pub use trie::PrefixTrie;

// Re-export loading
pub use loader::{load_path, load_reader, load_str, parse_line, LoadConfig, LoadReport};
