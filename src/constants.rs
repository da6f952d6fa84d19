// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the federated ingress DNS controller.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Controller Identity
// ============================================================================

/// Name of the controller, used in log lines and as the runtime thread name
pub const CONTROLLER_NAME: &str = "ingress-dns";

// ============================================================================
// Annotations
// ============================================================================

/// Annotation holding the federation-wide load balancer status of an ingress.
///
/// Written by the companion status controller as a JSON object mapping
/// cluster name to a list of load balancer statuses.
pub const GLOBAL_INGRESS_LB_STATUS_ANNOTATION: &str =
    "kubernetes.io/ingress.global-ingress-lb-status";

// ============================================================================
// DNS Naming
// ============================================================================

/// Suffix token placed between the federation name and the hierarchy labels
/// when none is configured
pub const DEFAULT_INGRESS_DNS_SUFFIX: &str = "ing";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// TTL for every record the controller publishes (3 minutes).
///
/// This is the minimum safe TTL for records that move between A and CNAME.
pub const MIN_DNS_TTL_SECS: i64 = 180;

/// TTL substituted when a provider reports an invalid or negative value
pub const FALLBACK_DNS_TTL_SECS: i64 = 60;

// ============================================================================
// Controller Loop Constants
// ============================================================================

/// Number of worker tasks when none is configured
pub const DEFAULT_WORKER_COUNT: usize = 1;

/// Interval between full re-lists of every ingress (30 seconds)
pub const DEFAULT_RESYNC_PERIOD_SECS: u64 = 30;

// ============================================================================
// Option Defaults
// ============================================================================

/// DNS provider used when none is configured
pub const DEFAULT_DNS_PROVIDER: &str = "in-memory";

/// Domain used when none is configured
pub const DEFAULT_DOMAIN: &str = "d1.example.com";

/// Federation name used when none is configured
pub const DEFAULT_FEDERATION_NAME: &str = "akube";
