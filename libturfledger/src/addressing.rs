// Copyright 2021 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! State addresses.
//!
//! Every contract owns the slice of global state whose addresses start with the first six hex
//! characters of the sha512 of its name. The natural key follows the prefix unhashed, so a
//! prefix scan returns a namespace in key order.

use sha2::{Digest, Sha512};

/// Length of the namespace prefix, in hex characters.
pub const NAMESPACE_PREFIX_LEN: usize = 6;

pub fn hash(to_hash: &str) -> String {
    hex::encode(Sha512::digest(to_hash.as_bytes()))
}

/// Returns the six character prefix owned by `namespace`.
pub fn namespace_prefix(namespace: &str) -> String {
    let mut prefix = hash(namespace);
    prefix.truncate(NAMESPACE_PREFIX_LEN);
    prefix
}

pub fn make_address(namespace: &str, key: &str) -> String {
    namespace_prefix(namespace) + key
}

/// Strips the namespace prefix from `address`, returning `None` if the address belongs to a
/// different namespace.
pub fn natural_key<'a>(namespace: &str, address: &'a str) -> Option<&'a str> {
    address.strip_prefix(namespace_prefix(namespace).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_distinct_per_contract() {
        let names = [
            "generalcontract",
            "bumpy",
            "razor",
            "inspect",
            "mower",
            "customer",
        ];
        let mut prefixes = names
            .iter()
            .map(|name| namespace_prefix(name))
            .collect::<Vec<_>>();
        prefixes.sort();
        prefixes.dedup();

        assert_eq!(names.len(), prefixes.len());
        assert!(prefixes.iter().all(|p| p.len() == NAMESPACE_PREFIX_LEN));
    }

    #[test]
    fn natural_key_round_trip() {
        let address = make_address("mower", "sla-1");

        assert_eq!(Some("sla-1"), natural_key("mower", &address));
        assert_eq!(None, natural_key("customer", &address));
    }
}
