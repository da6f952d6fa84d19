// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory DNS provider.
//!
//! Keeps every zone and record set in process memory behind async locks, so it
//! is safe to share between concurrent workers. A changeset is applied under a
//! single write lock: either every queued removal and addition takes effect or
//! none does.
//!
//! # Configuration
//!
//! The optional YAML config file lists zones to create up front:
//!
//! ```yaml
//! zones:
//!   - example.com
//!   - d1.example.com
//! ```

use super::{
    normalize_dns_name, record_sets_equivalent, Changeset, DnsProvider, RecordSet, RecordSets,
    Zone, Zones,
};
use crate::errors::{IngressDnsError, ProviderError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Registry name of this provider
pub const PROVIDER_NAME: &str = "in-memory";

/// Config file contents
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InMemoryConfig {
    #[serde(default)]
    zones: Vec<String>,
}

/// Registry factory for the in-memory provider.
///
/// # Errors
///
/// Returns [`IngressDnsError::Config`] if the config is not valid YAML.
pub fn from_config(config: Option<&str>) -> Result<Arc<dyn DnsProvider>, IngressDnsError> {
    let config: InMemoryConfig = match config {
        Some(raw) if !raw.trim().is_empty() => serde_yaml::from_str(raw).map_err(|e| {
            IngressDnsError::Config(format!("invalid in-memory provider config: {e}"))
        })?,
        _ => InMemoryConfig::default(),
    };

    let zones: Vec<&str> = config.zones.iter().map(String::as_str).collect();
    Ok(Arc::new(InMemoryProvider::with_zones(&zones)))
}

/// DNS provider holding all state in memory.
#[derive(Default)]
pub struct InMemoryProvider {
    zones: Arc<InMemoryZones>,
}

impl InMemoryProvider {
    /// Create a provider without any zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider pre-populated with empty zones.
    #[must_use]
    pub fn with_zones(names: &[&str]) -> Self {
        let applied = Arc::new(AtomicUsize::new(0));
        let zones = names
            .iter()
            .enumerate()
            .map(|(id, name)| {
                (
                    normalize_dns_name(name),
                    Arc::new(InMemoryZone::new(name, id, applied.clone())),
                )
            })
            .collect();

        Self {
            zones: Arc::new(InMemoryZones {
                state: RwLock::new(zones),
                next_id: AtomicUsize::new(names.len()),
                applied,
            }),
        }
    }

    /// Number of non-empty changesets applied across all zones.
    #[must_use]
    pub fn applied_changesets(&self) -> usize {
        self.zones.applied.load(Ordering::SeqCst)
    }
}

impl DnsProvider for InMemoryProvider {
    fn zones(&self) -> Option<Arc<dyn Zones>> {
        Some(self.zones.clone())
    }
}

#[derive(Default)]
struct InMemoryZones {
    state: RwLock<BTreeMap<String, Arc<InMemoryZone>>>,
    next_id: AtomicUsize,
    applied: Arc<AtomicUsize>,
}

#[async_trait]
impl Zones for InMemoryZones {
    async fn list(&self) -> Result<Vec<Arc<dyn Zone>>, ProviderError> {
        let state = self.state.read().await;
        Ok(state
            .values()
            .map(|zone| zone.clone() as Arc<dyn Zone>)
            .collect())
    }

    async fn new_zone(&self, name: &str) -> Result<Arc<dyn Zone>, ProviderError> {
        let key = normalize_dns_name(name);
        let mut state = self.state.write().await;
        if state.contains_key(&key) {
            return Err(ProviderError::ZoneAlreadyExists {
                zone: name.to_string(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let zone = Arc::new(InMemoryZone::new(name, id, self.applied.clone()));
        state.insert(key, zone.clone());
        debug!(zone = name, id, "Created in-memory zone");
        Ok(zone)
    }
}

/// A hosted zone held in memory.
#[derive(Debug)]
pub struct InMemoryZone {
    name: String,
    id: String,
    records: Arc<InMemoryRecordSets>,
}

impl InMemoryZone {
    fn new(name: &str, id: usize, applied: Arc<AtomicUsize>) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            records: Arc::new(InMemoryRecordSets {
                zone: name.to_string(),
                state: Arc::new(RwLock::new(Vec::new())),
                applied,
            }),
        }
    }
}

impl Zone for InMemoryZone {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn record_sets(&self) -> Option<Arc<dyn RecordSets>> {
        Some(self.records.clone())
    }
}

#[derive(Debug)]
struct InMemoryRecordSets {
    zone: String,
    state: Arc<RwLock<Vec<RecordSet>>>,
    applied: Arc<AtomicUsize>,
}

#[async_trait]
impl RecordSets for InMemoryRecordSets {
    async fn list(&self) -> Result<Vec<RecordSet>, ProviderError> {
        Ok(self.state.read().await.clone())
    }

    async fn get(&self, name: &str) -> Result<Vec<RecordSet>, ProviderError> {
        let wanted = normalize_dns_name(name);
        Ok(self
            .state
            .read()
            .await
            .iter()
            .filter(|rrset| normalize_dns_name(rrset.name()) == wanted)
            .cloned()
            .collect())
    }

    fn start_changeset(&self) -> Box<dyn Changeset> {
        Box::new(InMemoryChangeset {
            zone: self.zone.clone(),
            state: self.state.clone(),
            applied: self.applied.clone(),
            additions: Vec::new(),
            removals: Vec::new(),
        })
    }
}

struct InMemoryChangeset {
    zone: String,
    state: Arc<RwLock<Vec<RecordSet>>>,
    applied: Arc<AtomicUsize>,
    additions: Vec<RecordSet>,
    removals: Vec<RecordSet>,
}

impl InMemoryChangeset {
    fn same_key(a: &RecordSet, b: &RecordSet) -> bool {
        a.rrs_type() == b.rrs_type() && normalize_dns_name(a.name()) == normalize_dns_name(b.name())
    }
}

#[async_trait]
impl Changeset for InMemoryChangeset {
    fn add(&mut self, rrset: RecordSet) {
        self.additions.push(rrset);
    }

    fn remove(&mut self, rrset: RecordSet) {
        self.removals.push(rrset);
    }

    fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    async fn apply(&mut self) -> Result<(), ProviderError> {
        if self.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().await;
        let mut next = state.clone();

        for removal in &self.removals {
            let Some(position) = next
                .iter()
                .position(|existing| record_sets_equivalent(existing, removal))
            else {
                return Err(ProviderError::RecordSetNotFound {
                    name: removal.name().to_string(),
                    rrs_type: removal.rrs_type().to_string(),
                    zone: self.zone.clone(),
                });
            };
            next.remove(position);
        }

        for addition in &self.additions {
            if next
                .iter()
                .any(|existing| Self::same_key(existing, addition))
            {
                return Err(ProviderError::RecordSetAlreadyExists {
                    name: addition.name().to_string(),
                    rrs_type: addition.rrs_type().to_string(),
                    zone: self.zone.clone(),
                });
            }
            next.push(addition.clone());
        }

        debug!(
            zone = %self.zone,
            removed = self.removals.len(),
            added = self.additions.len(),
            "Applied in-memory changeset"
        );
        *state = next;
        self.applied.fetch_add(1, Ordering::SeqCst);
        self.additions.clear();
        self.removals.clear();
        Ok(())
    }
}

#[cfg(test)]
#[path = "inmemory_tests.rs"]
mod inmemory_tests;
