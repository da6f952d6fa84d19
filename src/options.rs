// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line options for the federated ingress DNS controller.
//!
//! Every flag can also be set through an environment variable, which is how the
//! controller is usually configured when it runs as a Deployment.
//!
//! # Example
//!
//! ```text
//! federated-ingress-dns \
//!     --dns-provider in-memory \
//!     --dns-provider-config /etc/federated-ingress-dns/provider.yaml \
//!     --domain federation.example.com \
//!     --federation-name myfederation
//! ```

use crate::constants::{
    DEFAULT_DNS_PROVIDER, DEFAULT_DOMAIN, DEFAULT_FEDERATION_NAME, DEFAULT_INGRESS_DNS_SUFFIX,
    DEFAULT_RESYNC_PERIOD_SECS, DEFAULT_WORKER_COUNT,
};
use crate::errors::IngressDnsError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Options of the federated ingress DNS controller.
#[derive(Parser, Debug, Clone)]
#[command(name = "federated-ingress-dns")]
#[command(about = "Publishes zone, region and global DNS records for federated ingresses")]
pub struct Options {
    /// DNS provider backend.
    #[arg(long, env = "DNS_PROVIDER", default_value = DEFAULT_DNS_PROVIDER)]
    pub dns_provider: String,

    /// Provider config file (YAML).
    #[arg(long, env = "DNS_PROVIDER_CONFIG")]
    pub dns_provider_config: Option<PathBuf>,

    /// DNS domain under which every record is published.
    #[arg(long, env = "DNS_DOMAIN", default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// Federation name, part of every published record name.
    #[arg(long, env = "FEDERATION_NAME", default_value = DEFAULT_FEDERATION_NAME)]
    pub federation_name: String,

    /// Ingress DNS suffix (part between the federation name and the zone/region labels).
    /// Defaults to "ing" when empty.
    #[arg(long, env = "INGRESS_DNS_SUFFIX", default_value = DEFAULT_INGRESS_DNS_SUFFIX)]
    pub ingress_dns_suffix: String,

    /// Number of concurrent reconciliation workers.
    #[arg(long, env = "WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Interval in seconds between full re-lists of every ingress. 0 disables resync.
    #[arg(long, env = "RESYNC_PERIOD_SECS", default_value_t = DEFAULT_RESYNC_PERIOD_SECS)]
    pub resync_period_secs: u64,

    /// Address to serve Prometheus metrics on (e.g. 0.0.0.0:8080).
    #[arg(long, env = "METRICS_BIND_ADDRESS")]
    pub metrics_bind_address: Option<SocketAddr>,
}

/// Naming settings shared by every reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSettings {
    /// Federation name
    pub federation_name: String,
    /// Root domain of every published record
    pub domain: String,
    /// Suffix token placed after the federation name
    pub suffix: String,
}

impl DnsSettings {
    /// Build settings, substituting the default suffix when `suffix` is empty.
    #[must_use]
    pub fn new(
        federation_name: impl Into<String>,
        domain: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        let suffix = suffix.into();
        Self {
            federation_name: federation_name.into(),
            domain: domain.into(),
            suffix: if suffix.is_empty() {
                DEFAULT_INGRESS_DNS_SUFFIX.to_string()
            } else {
                suffix
            },
        }
    }
}

impl Options {
    /// Validate the options and extract the naming settings.
    ///
    /// # Errors
    ///
    /// Returns [`IngressDnsError::Config`] when the federation name, domain or
    /// provider is empty, or when the worker pool would be empty.
    pub fn validate(&self) -> Result<DnsSettings, IngressDnsError> {
        if self.federation_name.trim().is_empty() {
            return Err(IngressDnsError::Config(
                "the controller should not be run without a federation name".to_string(),
            ));
        }
        if self.domain.trim().is_empty() {
            return Err(IngressDnsError::Config(
                "the controller must be run with a domain".to_string(),
            ));
        }
        if self.dns_provider.trim().is_empty() {
            return Err(IngressDnsError::Config(
                "the controller should not be run without a DNS provider".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(IngressDnsError::Config(
                "at least one worker is required".to_string(),
            ));
        }

        Ok(DnsSettings::new(
            self.federation_name.trim(),
            self.domain.trim(),
            self.ingress_dns_suffix.trim(),
        ))
    }

    /// Resync interval, or `None` when periodic resync is disabled.
    #[must_use]
    pub fn resync_period(&self) -> Option<Duration> {
        (self.resync_period_secs > 0).then(|| Duration::from_secs(self.resync_period_secs))
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod options_tests;
