// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS name hierarchy of a federated ingress.
//!
//! Every ingress gets one DNS name per hierarchy level, built from a common
//! prefix `<name>.<namespace>.<federation>.<suffix>`:
//!
//! ```text
//! ingname.ingns.myfed.ing.foozone.fooregion.example.com   zone level
//! ingname.ingns.myfed.ing.fooregion.example.com           region level
//! ingname.ingns.myfed.ing.example.com                     global level
//! ```
//!
//! Each level either holds A records for the healthy endpoints at that level, or
//! a CNAME to the next level up. The global level has no level above it.

use crate::crd::ClusterTopology;
use crate::errors::IngressDnsError;
use crate::options::DnsSettings;
use std::fmt;

/// Hierarchy level of a DNS name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HierarchyLevel {
    /// Cluster availability zone
    Zone,
    /// Cluster region
    Region,
    /// Whole federation
    Global,
}

impl HierarchyLevel {
    /// Levels in reconciliation order.
    pub const ALL: [HierarchyLevel; 3] = [Self::Zone, Self::Region, Self::Global];

    /// Lowercase name, used as a metrics label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::Region => "region",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four names of an ingress: zone, region, global, and the empty
/// "no parent" sentinel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsNameChain {
    names: [String; 4],
}

impl DnsNameChain {
    /// Build the chain of `namespace/name` for a cluster.
    ///
    /// Only the first zone of a multi-zone cluster is used.
    ///
    /// # Errors
    ///
    /// Returns [`IngressDnsError::TopologyLookup`] if the cluster reports no zone.
    pub fn new(
        settings: &DnsSettings,
        namespace: &str,
        name: &str,
        cluster: &str,
        topology: &ClusterTopology,
    ) -> Result<Self, IngressDnsError> {
        let Some(zone) = topology.zones.first() else {
            return Err(IngressDnsError::TopologyLookup {
                cluster: cluster.to_string(),
                reason: "cluster reports no zone names".to_string(),
            });
        };

        let common_prefix = [
            name,
            namespace,
            settings.federation_name.as_str(),
            settings.suffix.as_str(),
        ]
        .join(".");
        let region = topology.region.as_str();
        let domain = settings.domain.as_str();

        Ok(Self {
            names: [
                [common_prefix.as_str(), zone.as_str(), region, domain].join("."),
                [common_prefix.as_str(), region, domain].join("."),
                [common_prefix.as_str(), domain].join("."),
                String::new(),
            ],
        })
    }

    /// Name at `level`.
    #[must_use]
    pub fn name(&self, level: HierarchyLevel) -> &str {
        &self.names[Self::index(level)]
    }

    /// Alias target of `level`: the name one level up, empty for the global level.
    #[must_use]
    pub fn uplevel(&self, level: HierarchyLevel) -> &str {
        &self.names[Self::index(level) + 1]
    }

    /// `(level, name, uplevel)` triples in reconciliation order.
    pub fn levels(&self) -> impl Iterator<Item = (HierarchyLevel, &str, &str)> {
        HierarchyLevel::ALL
            .into_iter()
            .map(move |level| (level, self.name(level), self.uplevel(level)))
    }

    fn index(level: HierarchyLevel) -> usize {
        match level {
            HierarchyLevel::Zone => 0,
            HierarchyLevel::Region => 1,
            HierarchyLevel::Global => 2,
        }
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod hierarchy_tests;
