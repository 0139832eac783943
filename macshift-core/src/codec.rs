//! Address codec
//!
//! Pure validation, generation and scanning of hardware addresses written as
//! six hex pairs separated by `:` or `-`. Nothing in here performs I/O or
//! returns an error: failure is a `false` or a `None`.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

use crate::types::{MacAddr, LOCAL_BIT, MULTICAST_BIT};

lazy_static! {
    static ref MAC_EXACT: Regex = Regex::new(r"^(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").unwrap();
    static ref MAC_ANYWHERE: Regex = Regex::new(r"(?:[0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}").unwrap();
}

/// Check that `candidate` is exactly six hex pairs separated by `:` or `-`.
///
/// Case-insensitive, no normalization, nothing allowed before or after.
pub fn validate(candidate: &str) -> bool {
    MAC_EXACT.is_match(candidate)
}

/// Generate a random unicast, locally administered address.
pub fn generate() -> MacAddr {
    generate_with(&mut rand::thread_rng())
}

/// Generate an address from the given random source.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> MacAddr {
    let mut octets = [0u8; 6];
    rng.fill(&mut octets);
    octets[0] = (octets[0] & !MULTICAST_BIT) | LOCAL_BIT;
    MacAddr::new(octets)
}

/// Return the first address found anywhere in `raw`.
///
/// Meant for the output of interface query commands, where a later match
/// (e.g. the broadcast address) must not win over the link address.
pub fn find_in_text(raw: &str) -> Option<MacAddr> {
    MAC_ANYWHERE
        .find(raw)
        .and_then(|m| m.as_str().parse().ok())
}
