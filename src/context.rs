// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for every reconciliation pass.
//!
//! Workers receive an `Arc<Context>` that contains:
//! - the hosted zone selected at startup
//! - the federation control plane client
//! - the endpoint resolver
//! - the DNS naming settings
//!
//! Everything in the context is read-only after initialization. The provider's
//! changeset apply is the only mutation point, so no locking happens here.

use crate::dnsprovider::{RecordSets, Zone};
use crate::errors::IngressDnsError;
use crate::federation::FederationClient;
use crate::options::DnsSettings;
use crate::resolver::EndpointResolver;
use std::sync::Arc;

/// Handles injected into every reconciliation.
#[derive(Clone)]
pub struct Context {
    /// Hosted zone every record is published in
    pub zone: Arc<dyn Zone>,

    /// Federation control plane client
    pub federation: Arc<dyn FederationClient>,

    /// Hostname resolver for load balancer endpoints
    pub resolver: Arc<dyn EndpointResolver>,

    /// Federation name, domain and suffix
    pub settings: DnsSettings,
}

impl Context {
    /// Record set store of the hosted zone.
    ///
    /// # Errors
    ///
    /// Returns [`IngressDnsError::Unsupported`] if the provider cannot manage
    /// record sets.
    pub fn record_sets(&self) -> Result<Arc<dyn RecordSets>, IngressDnsError> {
        self.zone
            .record_sets()
            .ok_or(IngressDnsError::Unsupported {
                capability: "record set management",
            })
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("zone", &self.zone.name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
