// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # Federated Ingress DNS Controller
//!
//! Publishes DNS records that steer traffic to the healthy load balancer
//! endpoints of an ingress replicated across the clusters of a federation.
//!
//! ## Overview
//!
//! For each ingress, and for each cluster listed in its global load balancer
//! status, the controller keeps three names converged:
//!
//! - a **zone** name, answering with the endpoints in the cluster's zone
//! - a **region** name, answering with the endpoints in the cluster's region
//! - a **global** name, answering with every endpoint in the federation
//!
//! A level with no healthy endpoint becomes an alias (CNAME) of the level above.
//!
//! ## Modules
//!
//! - [`controller`] - Watch/queue loop and worker pool
//! - [`reconcilers`] - Endpoint aggregation, name hierarchy and record convergence
//! - [`dnsprovider`] - DNS provider contract and the in-memory backend
//! - [`federation`] - Federation control plane client
//! - [`ingress`] - Federated ingress model and status annotation parsing
//! - [`crd`] - Federation `Cluster` resource and load balancer status types
//! - [`context`] - Handles shared by every reconciliation
//!
//! ## Example
//!
//! ```rust,no_run
//! use federated_ingress_dns::crd::{LoadBalancerAddress, LoadBalancerStatus};
//! use federated_ingress_dns::ingress::FederatedIngress;
//! use std::collections::BTreeMap;
//!
//! let status = BTreeMap::from([(
//!     "cluster-a".to_string(),
//!     vec![LoadBalancerStatus {
//!         ingress: vec![LoadBalancerAddress::ip("198.51.100.1")],
//!     }],
//! )]);
//!
//! let ingress = FederatedIngress::new("default", "web")
//!     .with_global_lb_status(&status)
//!     .unwrap();
//! assert!(ingress.global_lb_status().unwrap().is_some());
//! ```

pub mod constants;
pub mod context;
pub mod controller;
pub mod crd;
pub mod dnsprovider;
pub mod errors;
pub mod federation;
pub mod ingress;
pub mod metrics;
pub mod options;
pub mod reconcilers;
pub mod resolver;

#[cfg(test)]
mod test_support;
