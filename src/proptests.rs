use crate::trie::PrefixTrie;
use crate::Matcher;

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use proptest::prelude::*;
use std::net::{Ipv4Addr, Ipv6Addr};

fn v4_prefix() -> impl Strategy<Value = (u32, u8)> {
    // Bias towards a small top-level range so prefixes overlap and tile.
    (any::<u32>(), 0u8..=32).prop_map(|(addr, len)| (addr & 0xC0FF_FFFF, len))
}

fn v6_prefix() -> impl Strategy<Value = (u128, u8)> {
    (any::<u128>(), prop_oneof![0u8..=8, 0u8..=128])
}

fn naive_v4(nets: &[Ipv4Net], addr: u32) -> bool {
    let ip = Ipv4Addr::from(addr);
    nets.iter().any(|n| n.contains(&ip))
}

proptest! {
    #[test]
    fn prop_v4_agrees_with_scan(
        prefixes in prop::collection::vec(v4_prefix(), 0..64),
        lookups in prop::collection::vec(any::<u32>(), 0..64),
    ) {
        let mut trie = PrefixTrie::new(32);
        let mut nets = Vec::new();
        for &(addr, len) in &prefixes {
            trie.add(&addr.to_be_bytes(), len as usize);
            trie.validate();
            nets.push(Ipv4Net::new(Ipv4Addr::from(addr), len).unwrap());
        }

        for &(addr, _) in &prefixes {
            prop_assert!(trie.matches(&addr.to_be_bytes()));
        }
        for &addr_bits in &lookups {
            prop_assert_eq!(trie.matches(&addr_bits.to_be_bytes()), naive_v4(&nets, addr_bits));
        }
    }

    #[test]
    fn prop_coverage_never_shrinks(
        prefixes in prop::collection::vec(v4_prefix(), 1..48),
        lookups in prop::collection::vec(any::<u32>(), 1..32),
    ) {
        let mut trie = PrefixTrie::new(32);
        let mut before: Vec<bool> = lookups
            .iter()
            .map(|a| trie.matches(&a.to_be_bytes()))
            .collect();
        for &(addr, len) in &prefixes {
            trie.add(&addr.to_be_bytes(), len as usize);
            for (addr_bits, was) in lookups.iter().zip(before.iter_mut()) {
                let now = trie.matches(&addr_bits.to_be_bytes());
                prop_assert!(!*was || now);
                *was = now;
            }
        }
    }

    #[test]
    fn prop_reinsertion_is_idempotent(
        prefixes in prop::collection::vec(v4_prefix(), 0..48),
    ) {
        let mut trie = PrefixTrie::new(32);
        for &(addr, len) in &prefixes {
            trie.add(&addr.to_be_bytes(), len as usize);
        }
        let shape = trie.shape();
        let nodes = trie.node_count();

        for &(addr, len) in &prefixes {
            trie.add(&addr.to_be_bytes(), len as usize);
        }
        prop_assert_eq!(trie.shape(), shape);
        prop_assert_eq!(trie.node_count(), nodes);
    }

    #[test]
    fn prop_v6_matcher_agrees_with_scan(
        prefixes in prop::collection::vec(v6_prefix(), 0..32),
        lookups in prop::collection::vec(any::<u128>(), 0..32),
    ) {
        let mut matcher = Matcher::v6();
        let mut nets = Vec::new();
        for &(addr, len) in &prefixes {
            let net = Ipv6Net::new(Ipv6Addr::from(addr), len).unwrap();
            matcher.add_net(&IpNet::V6(net));
            nets.push(net);
        }

        for &addr_bits in &lookups {
            let ip = Ipv6Addr::from(addr_bits);
            let expected = nets.iter().any(|n| n.contains(&ip));
            prop_assert_eq!(matcher.matches(&ip.octets()), expected);
        }
    }
}
