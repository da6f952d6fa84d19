// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Healthy endpoint aggregation.
//!
//! Turns the federation-wide load balancer status of an ingress into the
//! endpoint sets of the three hierarchy levels, as seen from one cluster:
//!
//! - **zone**: addresses from clusters sharing a zone name with the cluster
//! - **region**: addresses from clusters in the cluster's region
//! - **global**: every address
//!
//! Zone and region membership are tested independently; the zone set is not
//! assumed to be a subset of the region set.

use crate::context::Context;
use crate::crd::ClusterTopology;
use crate::errors::IngressDnsError;
use crate::ingress::FederatedIngress;
use std::collections::BTreeSet;
use tracing::debug;

/// Endpoint sets of one ingress at the zone, region and global levels.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HealthyEndpoints {
    /// Endpoints in the cluster's zone(s)
    pub zone: BTreeSet<String>,
    /// Endpoints in the cluster's region
    pub region: BTreeSet<String>,
    /// Endpoints anywhere in the federation
    pub global: BTreeSet<String>,
}

impl HealthyEndpoints {
    /// Endpoint sets ordered zone, region, global.
    #[must_use]
    pub fn levels(&self) -> [&BTreeSet<String>; 3] {
        [&self.zone, &self.region, &self.global]
    }

    /// True when no level has an endpoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.region.is_empty() && self.zone.is_empty()
    }
}

/// Healthy endpoints of `ingress` at each hierarchy level, from the point of
/// view of `cluster`.
///
/// # Errors
///
/// Returns an error if a cluster topology cannot be fetched, the status
/// annotation is malformed, or a load balancer entry has neither an IP nor a
/// hostname.
pub async fn get_healthy_endpoints(
    ctx: &Context,
    cluster: &str,
    ingress: &FederatedIngress,
) -> Result<HealthyEndpoints, IngressDnsError> {
    let topology = ctx.federation.cluster_topology(cluster).await?;
    aggregate_endpoints(ctx, cluster, &topology, ingress).await
}

/// Same as [`get_healthy_endpoints`] with the cluster topology already fetched.
pub(crate) async fn aggregate_endpoints(
    ctx: &Context,
    cluster: &str,
    topology: &ClusterTopology,
    ingress: &FederatedIngress,
) -> Result<HealthyEndpoints, IngressDnsError> {
    let mut endpoints = HealthyEndpoints::default();

    // Deleted ingress: publish nothing so every record gets torn down
    if ingress.deleted {
        debug!(ingress = %ingress, cluster, "Ingress deleted, no healthy endpoints");
        return Ok(endpoints);
    }

    let Some(global_status) = ingress.global_lb_status()? else {
        debug!(ingress = %ingress, "No global load balancer status");
        return Ok(endpoints);
    };

    for (lb_cluster, statuses) in &global_status {
        let lb_topology = ctx.federation.cluster_topology(lb_cluster).await?;
        let same_zone = lb_topology.shares_zone_with(topology);
        let same_region = lb_topology.region == topology.region;

        for address in statuses.iter().flat_map(|status| &status.ingress) {
            let endpoint = address
                .endpoint()
                .ok_or_else(|| IngressDnsError::EndpointData {
                    namespace: ingress.namespace.clone(),
                    name: ingress.name.clone(),
                    cluster: cluster.to_string(),
                })?;

            if same_zone {
                endpoints.zone.insert(endpoint.to_string());
            }
            if same_region {
                endpoints.region.insert(endpoint.to_string());
            }
            endpoints.global.insert(endpoint.to_string());
        }
    }

    debug!(
        ingress = %ingress,
        cluster,
        zone = ?endpoints.zone,
        region = ?endpoints.region,
        global = ?endpoints.global,
        "Aggregated healthy endpoints"
    );
    Ok(endpoints)
}

#[cfg(test)]
#[path = "endpoints_tests.rs"]
mod endpoints_tests;
