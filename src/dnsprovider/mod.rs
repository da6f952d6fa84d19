// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Abstract DNS provider contract consumed by the reconcilers.
//!
//! A provider exposes hosted zones; a zone exposes its record sets; record sets
//! are mutated only through a [`Changeset`], which applies every queued addition
//! and removal as one unit.
//!
//! Capabilities are optional: [`DnsProvider::zones`] and [`Zone::record_sets`]
//! return `None` when a backend cannot enumerate zones or manage record sets, and
//! the controller fails with an explicit "unsupported" error in that case.
//!
//! # Backends
//!
//! Backends register themselves in [`init_dns_provider`] by name. The built-in
//! [`inmemory`] backend keeps all state in process memory.
//!
//! # Example
//!
//! ```rust,no_run
//! use federated_ingress_dns::dnsprovider::{init_dns_provider, RecordType};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = init_dns_provider("in-memory", None).await?;
//! let zones = provider.zones().expect("in-memory provider enumerates zones");
//! let zone = zones.new_zone("example.com").await?;
//! let rrsets = zone.record_sets().expect("in-memory provider manages records");
//!
//! let rrset = rrsets.new_record_set(
//!     "www.example.com",
//!     vec!["192.0.2.1".to_string()],
//!     180,
//!     RecordType::A,
//! );
//! let mut changeset = rrsets.start_changeset();
//! changeset.add(rrset);
//! changeset.apply().await?;
//! # Ok(())
//! # }
//! ```

pub mod inmemory;

use crate::constants::FALLBACK_DNS_TTL_SECS;
use crate::errors::{IngressDnsError, ProviderError};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// DNS record types the controller publishes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// Canonical name (alias) record
    CNAME,
}

impl RecordType {
    /// Returns the record type as it appears in zone files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::CNAME => "CNAME",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "CNAME" => Ok(Self::CNAME),
            other => Err(ProviderError::Request(format!(
                "unsupported record type '{other}'"
            ))),
        }
    }
}

/// A named set of records of one type sharing a TTL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSet {
    name: String,
    rrs_type: RecordType,
    ttl: i64,
    rrdatas: Vec<String>,
}

impl RecordSet {
    /// Build a record set. Has no side effect on any provider.
    ///
    /// A negative TTL is replaced with [`FALLBACK_DNS_TTL_SECS`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        rrdatas: Vec<String>,
        ttl: i64,
        rrs_type: RecordType,
    ) -> Self {
        let name = name.into();
        let ttl = if ttl < 0 {
            warn!(
                dns_name = %name,
                ttl,
                "Invalid ttl, using default of {FALLBACK_DNS_TTL_SECS} seconds"
            );
            FALLBACK_DNS_TTL_SECS
        } else {
            ttl
        };

        Self {
            name,
            rrs_type,
            ttl,
            rrdatas,
        }
    }

    /// Fully qualified name of the record set
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type
    #[must_use]
    pub fn rrs_type(&self) -> RecordType {
        self.rrs_type
    }

    /// Time to live in seconds
    #[must_use]
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Record data (addresses for `A`, target names for `CNAME`)
    #[must_use]
    pub fn rrdatas(&self) -> &[String] {
        &self.rrdatas
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.name,
            self.ttl,
            self.rrs_type,
            self.rrdatas.join(" ")
        )
    }
}

/// A DNS provider, possibly supporting zone enumeration.
pub trait DnsProvider: Send + Sync {
    /// Zone enumeration and creation, or `None` if the backend cannot enumerate zones.
    fn zones(&self) -> Option<Arc<dyn Zones>>;
}

/// Hosted zone enumeration and creation.
#[async_trait]
pub trait Zones: Send + Sync {
    /// List every hosted zone known to the provider.
    async fn list(&self) -> Result<Vec<Arc<dyn Zone>>, ProviderError>;

    /// Create a new hosted zone.
    async fn new_zone(&self, name: &str) -> Result<Arc<dyn Zone>, ProviderError>;
}

/// A hosted zone.
pub trait Zone: Send + Sync + fmt::Debug {
    /// Zone name, possibly with a trailing root label separator
    fn name(&self) -> &str;

    /// Provider specific identifier
    fn id(&self) -> &str;

    /// Record set access, or `None` if the backend cannot manage record sets.
    fn record_sets(&self) -> Option<Arc<dyn RecordSets>>;
}

/// Record set store of one hosted zone.
#[async_trait]
pub trait RecordSets: Send + Sync {
    /// List every record set in the zone.
    async fn list(&self) -> Result<Vec<RecordSet>, ProviderError>;

    /// Record sets with the given name.
    ///
    /// An absent name yields an empty list, not an error.
    async fn get(&self, name: &str) -> Result<Vec<RecordSet>, ProviderError>;

    /// Construct a record set suitable for this store. No side effect.
    fn new_record_set(
        &self,
        name: &str,
        rrdatas: Vec<String>,
        ttl: i64,
        rrs_type: RecordType,
    ) -> RecordSet {
        RecordSet::new(name, rrdatas, ttl, rrs_type)
    }

    /// Begin a batch of additions and removals.
    fn start_changeset(&self) -> Box<dyn Changeset>;
}

/// A batch of record set additions and removals applied as one unit.
///
/// Removals are applied before additions.
#[async_trait]
pub trait Changeset: Send {
    /// Queue a record set addition.
    fn add(&mut self, rrset: RecordSet);

    /// Queue a record set removal.
    fn remove(&mut self, rrset: RecordSet);

    /// True when nothing is queued.
    fn is_empty(&self) -> bool;

    /// Apply every queued operation. Applying an empty changeset is a no-op.
    async fn apply(&mut self) -> Result<(), ProviderError>;
}

/// Normalize a DNS name for comparison: lowercase, no trailing root label separator.
#[must_use]
pub fn normalize_dns_name(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Semantic equivalence of two record sets.
///
/// Same name, same type, same TTL and the same record data regardless of
/// ordering. Data lists of different length are never equivalent.
#[must_use]
pub fn record_sets_equivalent(a: &RecordSet, b: &RecordSet) -> bool {
    if normalize_dns_name(a.name()) != normalize_dns_name(b.name())
        || a.rrs_type() != b.rrs_type()
        || a.ttl() != b.ttl()
        || a.rrdatas().len() != b.rrdatas().len()
    {
        return false;
    }

    let datas = |rrset: &RecordSet| -> BTreeSet<String> {
        rrset
            .rrdatas()
            .iter()
            .map(|data| normalize_dns_name(data))
            .collect()
    };
    datas(a) == datas(b)
}

/// Find the first record set in `list` equivalent to `wanted`.
#[must_use]
pub fn find_equivalent<'a>(list: &'a [RecordSet], wanted: &RecordSet) -> Option<&'a RecordSet> {
    list.iter()
        .find(|existing| record_sets_equivalent(existing, wanted))
}

/// Factory building a provider from the contents of its config file.
type ProviderFactory = fn(Option<&str>) -> Result<Arc<dyn DnsProvider>, IngressDnsError>;

/// Every provider this build knows about, by name.
const REGISTERED_PROVIDERS: &[(&str, ProviderFactory)] =
    &[(inmemory::PROVIDER_NAME, inmemory::from_config)];

/// Names of every registered DNS provider.
#[must_use]
pub fn registered_dns_providers() -> Vec<&'static str> {
    REGISTERED_PROVIDERS.iter().map(|(name, _)| *name).collect()
}

/// Build the named DNS provider, reading its config file if one is given.
///
/// # Errors
///
/// Returns [`IngressDnsError::Config`] if the provider name is unknown, the
/// config file cannot be read, or the provider rejects its configuration.
pub async fn init_dns_provider(
    name: &str,
    config_path: Option<&Path>,
) -> Result<Arc<dyn DnsProvider>, IngressDnsError> {
    let Some((_, factory)) = REGISTERED_PROVIDERS
        .iter()
        .find(|(registered, _)| *registered == name)
    else {
        return Err(IngressDnsError::Config(format!(
            "unknown DNS provider '{name}', valid values are: {:?}",
            registered_dns_providers()
        )));
    };

    let config = match config_path {
        Some(path) => Some(tokio::fs::read_to_string(path).await.map_err(|e| {
            IngressDnsError::Config(format!(
                "failed to read DNS provider config {}: {e}",
                path.display()
            ))
        })?),
        None => None,
    };

    info!(provider = name, "Initializing DNS provider");
    factory(config.as_deref())
}
