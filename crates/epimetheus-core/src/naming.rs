//! Metric key derivation.
//!
//! Keys are built as `<family>_<instance>_<field>`, or `<family>_<field>` for
//! families with a single implicit instance. The instance token keeps ASCII
//! alphanumerics only, so `cpu-0` becomes `cpu0`. Because the token never
//! contains `_`, two distinct (instance, field) pairs of one family cannot
//! produce the same key unless their raw identities sanitize to the same
//! token; the catalog reports that case as a duplicate.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{EpimetheusError, Result};

/// Deterministic name of one gauge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey(String);

impl MetricKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MetricKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Strip every non-alphanumeric character from a raw instance identity.
pub fn sanitize_instance(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Build the key for one (family, instance, field) triple.
///
/// `instance` is the raw provider identity; `None` marks the implicit
/// instance of a single-instance family. Fails when the identity has no
/// alphanumeric characters at all.
pub fn metric_key(family: &str, instance: Option<&str>, field: &str) -> Result<MetricKey> {
    match instance {
        None => Ok(MetricKey(format!("{family}_{field}"))),
        Some(raw) => {
            let token = sanitize_instance(raw);
            if token.is_empty() {
                return Err(EpimetheusError::InvalidInstance(raw.to_string()));
            }
            Ok(MetricKey(format!("{family}_{token}_{field}")))
        }
    }
}
