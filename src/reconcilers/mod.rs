// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation logic for federated ingress DNS records.
//!
//! An ingress is reconciled once per cluster listed in its global load balancer
//! status. Each pass follows the same steps:
//!
//! 1. **Topology** - Look up the zones and region of the cluster
//! 2. **Names** - Derive the zone, region and global DNS names
//! 3. **Endpoints** - Aggregate healthy endpoints for each level
//! 4. **Records** - Converge each name to an A record or an alias
//!
//! # Available Reconcilers
//!
//! - [`reconcile_ingress`] - Reconciles every cluster of one ingress
//! - [`ensure_dns_records`] - Reconciles one ingress as seen from one cluster
//! - [`ensure_dns_rrsets`] - Converges a single DNS name
//! - [`retrieve_or_create_dns_zone`] - Selects the hosted zone at startup
//!
//! # Example
//!
//! ```rust,no_run
//! use federated_ingress_dns::context::Context;
//! use federated_ingress_dns::ingress::FederatedIngress;
//! use federated_ingress_dns::reconcilers::reconcile_ingress;
//!
//! async fn publish(ctx: &Context, ingress: FederatedIngress) -> anyhow::Result<()> {
//!     reconcile_ingress(ctx, &ingress).await?;
//!     Ok(())
//! }
//! ```

pub mod endpoints;
pub mod hierarchy;
pub mod ingress_dns;
pub mod records;
pub mod zone;

pub use endpoints::{get_healthy_endpoints, HealthyEndpoints};
pub use hierarchy::{DnsNameChain, HierarchyLevel};
pub use ingress_dns::{ensure_dns_records, reconcile_ingress};
pub use records::{ensure_dns_rrsets, RrsetOutcome};
pub use zone::{get_dns_zone, retrieve_or_create_dns_zone};
