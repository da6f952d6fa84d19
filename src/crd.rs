// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Federation resource types consumed by the controller.
//!
//! # Resource Types
//!
//! - [`Cluster`] - a member cluster of the federation, whose status carries the
//!   zones and region the cluster runs in
//!
//! # Annotation Types
//!
//! - [`GlobalLbStatus`] - the federation-wide load balancer status of an ingress,
//!   stored as JSON in the [`GLOBAL_INGRESS_LB_STATUS_ANNOTATION`] annotation
//!
//! # Example: Reading cluster topology
//!
//! ```rust
//! use federated_ingress_dns::crd::{Cluster, ClusterSpec, ClusterStatus};
//!
//! let mut cluster = Cluster::new("c1", ClusterSpec::default());
//! cluster.status = Some(ClusterStatus {
//!     zones: vec!["foozone".to_string()],
//!     region: Some("fooregion".to_string()),
//! });
//!
//! let topology = cluster.topology();
//! assert_eq!(topology.region, "fooregion");
//! ```
//!
//! [`GLOBAL_INGRESS_LB_STATUS_ANNOTATION`]: crate::constants::GLOBAL_INGRESS_LB_STATUS_ANNOTATION

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Address of the cluster API server for clients in a given CIDR.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerAddressByClientCidr {
    /// Client network the address applies to (e.g., "0.0.0.0/0")
    #[serde(rename = "clientCIDR")]
    pub client_cidr: String,

    /// API server address (`host` or `host:port`)
    pub server_address: String,
}

/// Reference to a secret in the federation control plane namespace.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LocalSecretReference {
    /// Secret name
    pub name: String,
}

/// Cluster describes a member cluster of the federation.
#[derive(CustomResource, Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "federation",
    version = "v1beta1",
    kind = "Cluster",
    doc = "Cluster is a member of the federation. Its status reports the availability zones and region the cluster runs in."
)]
#[kube(status = "ClusterStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Client network to API server address mappings.
    #[serde(default, rename = "serverAddressByClientCIDRs")]
    pub server_address_by_client_cidrs: Vec<ServerAddressByClientCidr>,

    /// Secret holding the credentials used to reach the cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<LocalSecretReference>,
}

/// Observed state of a member cluster.
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Availability zones the cluster's nodes run in
    #[serde(default)]
    pub zones: Vec<String>,

    /// Region the cluster runs in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Zones and region of one cluster.
///
/// Fetched on demand and never cached beyond a single reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterTopology {
    /// Zone names, first one is used in the zone level DNS name
    pub zones: Vec<String>,
    /// Region name
    pub region: String,
}

impl ClusterTopology {
    /// Build a topology from zone names and a region.
    #[must_use]
    pub fn new<S: Into<String>>(zones: impl IntoIterator<Item = S>, region: impl Into<String>) -> Self {
        Self {
            zones: zones.into_iter().map(Into::into).collect(),
            region: region.into(),
        }
    }

    /// True if any zone name is shared with `other`.
    #[must_use]
    pub fn shares_zone_with(&self, other: &ClusterTopology) -> bool {
        self.zones
            .iter()
            .any(|zone| other.zones.iter().any(|candidate| candidate == zone))
    }
}

impl Cluster {
    /// Topology reported by the cluster status. Missing fields are empty.
    #[must_use]
    pub fn topology(&self) -> ClusterTopology {
        self.status
            .as_ref()
            .map(|status| ClusterTopology {
                zones: status.zones.clone(),
                region: status.region.clone().unwrap_or_default(),
            })
            .unwrap_or_default()
    }
}

/// One load balancer address: an IP, a hostname, or both.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadBalancerAddress {
    /// IP address of the load balancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Hostname of the load balancer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl LoadBalancerAddress {
    /// IP address entry
    #[must_use]
    pub fn ip(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            hostname: None,
        }
    }

    /// Hostname entry
    #[must_use]
    pub fn hostname(hostname: impl Into<String>) -> Self {
        Self {
            ip: None,
            hostname: Some(hostname.into()),
        }
    }

    /// Usable endpoint of this entry, preferring the IP over the hostname.
    ///
    /// Returns `None` when neither is populated.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        fn non_empty(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }
        non_empty(&self.ip).or_else(|| non_empty(&self.hostname))
    }
}

/// Load balancer status of an ingress in one cluster.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadBalancerStatus {
    /// Load balancer addresses
    #[serde(default, alias = "addresses", skip_serializing_if = "Vec::is_empty")]
    pub ingress: Vec<LoadBalancerAddress>,
}

/// Federation-wide load balancer status: cluster name to the statuses reported there.
pub type GlobalLbStatus = BTreeMap<String, Vec<LoadBalancerStatus>>;

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
