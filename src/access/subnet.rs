//! Address matching for the network restriction rule.
//!
//! A subnet list is comma separated. Each entry is one of:
//!
//! * a full address: `192.168.10.1`, `2001:db8::1`
//! * a CIDR block: `192.168.0.0/16`, `2001:db8::/32`
//! * a dotted IPv4 prefix: `192.168` or `192.168.`
//! * an IPv4 range over the last octet: `192.168.10.1-20`

use std::net::{IpAddr, Ipv4Addr};

use ipnetwork::IpNetwork;
use once_cell::sync::Lazy;
use regex::Regex;

static RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3}\.\d{1,3}\.\d{1,3}\.)(\d{1,3})-(\d{1,3})$")
        .expect("RANGE_REGEX is a valid regex pattern")
});

static PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}(\.\d{1,3}){0,3}\.?$").expect("PREFIX_REGEX is a valid regex pattern")
});

pub fn address_in_subnet(address: &str, subnet_list: &str) -> bool {
    let Ok(address) = address.trim().parse::<IpAddr>() else {
        return false;
    };

    subnet_list
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry_matches(&address, entry))
}

fn entry_matches(address: &IpAddr, entry: &str) -> bool {
    if entry.contains('/') || entry.parse::<IpAddr>().is_ok() {
        return entry
            .parse::<IpNetwork>()
            .is_ok_and(|network| network.contains(*address));
    }

    if let Some(caps) = RANGE_REGEX.captures(entry) {
        let IpAddr::V4(v4) = address else {
            return false;
        };
        let (Ok(low), Ok(high)) = (caps[2].parse::<u8>(), caps[3].parse::<u8>()) else {
            return false;
        };
        let last = v4.octets()[3];
        let base = format!("{}{}", &caps[1], last);
        return base == v4.to_string() && (low..=high).contains(&last);
    }

    if PREFIX_REGEX.is_match(entry) {
        let IpAddr::V4(v4) = address else {
            return false;
        };
        return prefix_matches(v4, entry.trim_end_matches('.'));
    }

    false
}

fn prefix_matches(address: &Ipv4Addr, prefix: &str) -> bool {
    let octets = address.octets();
    prefix
        .split('.')
        .zip(octets.iter())
        .all(|(part, octet)| part.parse::<u8>().is_ok_and(|p| p == *octet))
}
