// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the federated ingress DNS controller.
//!
//! This module provides:
//! - [`ProviderError`] - failures reported by a DNS provider backend
//! - [`IngressDnsError`] - the error taxonomy of a reconciliation pass
//!
//! Every per-object error is caught at the worker boundary, logged and counted;
//! configuration and zone resolution errors are fatal at startup.

use thiserror::Error;

/// Errors reported by a DNS provider backend.
///
/// These errors represent failures of the zone, record set and changeset
/// operations of the provider contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Zone already exists when attempting to create it
    #[error("Zone '{zone}' already exists")]
    ZoneAlreadyExists {
        /// The zone name that already exists
        zone: String,
    },

    /// A changeset tried to remove a record set that does not exist
    ///
    /// The whole changeset is rejected; nothing is applied.
    #[error("Record set '{name}' ({rrs_type}) not found in zone '{zone}'")]
    RecordSetNotFound {
        /// The record set name
        name: String,
        /// The record type (e.g., `A`, `CNAME`)
        rrs_type: String,
        /// The zone that was searched
        zone: String,
    },

    /// A changeset tried to add a record set that already exists
    #[error("Record set '{name}' ({rrs_type}) already exists in zone '{zone}'")]
    RecordSetAlreadyExists {
        /// The record set name
        name: String,
        /// The record type (e.g., `A`, `CNAME`)
        rrs_type: String,
        /// The zone holding the existing record set
        zone: String,
    },

    /// Transport or backend failure that doesn't fit other categories
    #[error("DNS provider request failed: {0}")]
    Request(String),
}

/// Errors that can occur while reconciling DNS records for a federated ingress.
#[derive(Error, Debug)]
pub enum IngressDnsError {
    /// Missing or invalid configuration (federation name, domain, provider)
    ///
    /// Fatal: the controller never leaves initialization.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Hosted zone listing or creation failed
    #[error("Failed to resolve DNS zone for domain '{domain}': {reason}")]
    ZoneResolution {
        /// The configured domain
        domain: String,
        /// Explanation of the failure
        reason: String,
    },

    /// Cluster metadata (zones, region) could not be fetched
    #[error("Failed to look up topology of cluster '{cluster}': {reason}")]
    TopologyLookup {
        /// The federated cluster name
        cluster: String,
        /// Explanation of the failure
        reason: String,
    },

    /// The global load balancer status annotation is not valid JSON
    #[error("Failed to parse global load balancer status of ingress {namespace}/{name}: {reason}")]
    AnnotationParse {
        /// Ingress namespace
        namespace: String,
        /// Ingress name
        name: String,
        /// Parser error message
        reason: String,
    },

    /// A load balancer entry carries neither an IP address nor a hostname
    #[error(
        "Ingress {namespace}/{name} in cluster {cluster} has neither ip nor hostname in its \
         load balancer status, cannot use it as an endpoint"
    )]
    EndpointData {
        /// Ingress namespace
        namespace: String,
        /// Ingress name
        name: String,
        /// Cluster whose records were being reconciled
        cluster: String,
    },

    /// A hostname endpoint could not be resolved to addresses
    #[error("Failed to resolve endpoint '{endpoint}': {reason}")]
    Resolution {
        /// The endpoint hostname
        endpoint: String,
        /// Explanation of the failure
        reason: String,
    },

    /// Record set fetch or changeset apply failed
    #[error("DNS provider error for '{dns_name}': {source}")]
    Provider {
        /// The DNS name being reconciled
        dns_name: String,
        /// The underlying provider failure
        #[source]
        source: ProviderError,
    },

    /// The provider lacks a capability the controller requires
    #[error("DNS provider does not support {capability}")]
    Unsupported {
        /// The missing capability (e.g., "zone enumeration")
        capability: &'static str,
    },

    /// Kubernetes API error while listing resources
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// The ingress watch stream reported an error
    #[error("Ingress watch failed: {0}")]
    Watch(#[from] kube::runtime::watcher::Error),
}

impl IngressDnsError {
    /// Returns true if this error must stop the controller from starting.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ZoneResolution { .. } | Self::Unsupported { .. }
        )
    }

    /// Returns a stable reason code, used as the `reason` metrics label.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Config(_) => "InvalidConfiguration",
            Self::ZoneResolution { .. } => "ZoneResolutionFailed",
            Self::TopologyLookup { .. } => "TopologyLookupFailed",
            Self::AnnotationParse { .. } => "AnnotationParseFailed",
            Self::EndpointData { .. } => "InvalidEndpointData",
            Self::Resolution { .. } => "EndpointResolutionFailed",
            Self::Provider { .. } => "ProviderOperationFailed",
            Self::Unsupported { .. } => "ProviderCapabilityMissing",
            Self::Kube(_) => "KubernetesApiError",
            Self::Watch(_) => "WatchFailed",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
