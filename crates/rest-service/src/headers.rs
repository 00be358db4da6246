//! Header whitelisting and static header injection

use std::collections::{BTreeMap, BTreeSet};

use crate::config::HeaderEntry;

/// Header name to value mapping
pub type Headers = BTreeMap<String, String>;

/// Header rules of one client type
///
/// Header names are matched ASCII case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPolicy {
    /// Lowercased names allowed through from caller headers
    whitelist: BTreeSet<String>,
    /// Headers added to every request of this client
    static_headers: Headers,
}

impl HeaderPolicy {
    /// Build a policy from the global default names and a client's header entries
    pub fn new<'a, I>(default_headers: I, entries: &[HeaderEntry]) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut policy = Self {
            whitelist: default_headers
                .into_iter()
                .map(|name| name.to_ascii_lowercase())
                .collect(),
            static_headers: Headers::new(),
        };

        for entry in entries {
            match entry {
                HeaderEntry::Name(name) => {
                    policy.whitelist.insert(name.to_ascii_lowercase());
                }
                HeaderEntry::Values(values) => {
                    for (name, value) in values {
                        insert_replacing(&mut policy.static_headers, name, value.to_string());
                    }
                }
            }
        }

        policy
    }

    /// Whether a caller header with this name may be forwarded
    pub fn allows(&self, name: &str) -> bool {
        self.whitelist.contains(&name.to_ascii_lowercase())
    }

    /// Headers injected regardless of the caller
    pub fn static_headers(&self) -> &Headers {
        &self.static_headers
    }

    /// Compute the headers of a client instance
    ///
    /// Caller headers outside the whitelist are dropped; static headers are then
    /// added on top, replacing caller values of the same name. Returns `None` when
    /// nothing remains.
    pub fn merge(&self, caller: Option<&Headers>) -> Option<Headers> {
        let mut merged = Headers::new();

        // names differing only in case collapse to the last one in map order
        for (name, value) in caller.into_iter().flatten() {
            if self.allows(name) {
                insert_replacing(&mut merged, name, value.clone());
            }
        }

        for (name, value) in &self.static_headers {
            insert_replacing(&mut merged, name, value.clone());
        }

        if merged.is_empty() {
            None
        } else {
            Some(merged)
        }
    }
}

/// Insert a header, dropping any existing entry that differs only in case
fn insert_replacing(headers: &mut Headers, name: &str, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value);
}
