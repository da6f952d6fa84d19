// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS records of a federated ingress.
//!
//! For each cluster listed in the ingress's global load balancer status, the
//! zone, region and global names are reconciled in that order. A failure at one
//! level aborts the levels above it for that cluster; the ingress is picked up
//! again on its next watch event or resync.

use crate::context::Context;
use crate::errors::IngressDnsError;
use crate::ingress::FederatedIngress;
use crate::metrics;
use crate::reconcilers::endpoints::aggregate_endpoints;
use crate::reconcilers::hierarchy::DnsNameChain;
use crate::reconcilers::records::ensure_dns_rrsets;
use tracing::{debug, error};

/// Ensure, idempotently and with the fewest mutations, that every DNS record of
/// `ingress` as seen from `cluster` is correct.
///
/// # Errors
///
/// Returns the first error hit; levels after a failed level are not touched.
pub async fn ensure_dns_records(
    ctx: &Context,
    cluster: &str,
    ingress: &FederatedIngress,
) -> Result<(), IngressDnsError> {
    let topology = ctx.federation.cluster_topology(cluster).await?;
    let chain = DnsNameChain::new(
        &ctx.settings,
        &ingress.namespace,
        &ingress.name,
        cluster,
        &topology,
    )?;
    let endpoints = aggregate_endpoints(ctx, cluster, &topology, ingress).await?;
    let rrsets = ctx.record_sets()?;

    debug!(ingress = %ingress, cluster, chain = ?chain, "Ensuring DNS records");

    for ((level, dns_name, uplevel), level_endpoints) in chain.levels().zip(endpoints.levels()) {
        let outcome = ensure_dns_rrsets(
            rrsets.as_ref(),
            ctx.resolver.as_ref(),
            dns_name,
            level_endpoints,
            uplevel,
        )
        .await?;
        if outcome.mutated() {
            metrics::record_changeset_applied(level.as_str());
        }
    }

    Ok(())
}

/// Reconcile the DNS records of `ingress` for every cluster in its global
/// load balancer status.
///
/// Clusters are independent: a failure for one cluster is logged and the
/// remaining clusters are still reconciled. Nothing happens when the ingress
/// has no global status.
///
/// # Errors
///
/// Returns [`IngressDnsError::AnnotationParse`] if the status is malformed,
/// otherwise the first per-cluster error.
pub async fn reconcile_ingress(
    ctx: &Context,
    ingress: &FederatedIngress,
) -> Result<(), IngressDnsError> {
    let Some(global_status) = ingress.global_lb_status()? else {
        debug!(ingress = %ingress, "No global load balancer status, nothing to publish");
        return Ok(());
    };

    let mut first_error = None;
    for cluster in global_status.keys() {
        if let Err(e) = ensure_dns_records(ctx, cluster, ingress).await {
            error!(ingress = %ingress, cluster = %cluster, "Failed to ensure DNS records: {e}");
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}

#[cfg(test)]
#[path = "ingress_dns_tests.rs"]
mod ingress_dns_tests;
