// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hosted zone selection.
//!
//! The zone is picked once at startup. Zones are sorted longest name first and
//! the first one whose name appears in the configured domain wins, so a zone for
//! `d1.example.com` is preferred over `example.com` when the domain is
//! `d1.example.com`. When no zone matches, one is created for the domain.

use crate::dnsprovider::{Zone, Zones};
use crate::errors::{IngressDnsError, ProviderError};
use std::sync::Arc;
use tracing::{debug, info};

/// Most specific hosted zone matching `domain`, if any.
///
/// # Errors
///
/// Returns the provider error if the zones cannot be listed.
pub async fn get_dns_zone(
    domain: &str,
    zones: &dyn Zones,
) -> Result<Option<Arc<dyn Zone>>, ProviderError> {
    let mut candidates = zones.list().await?;
    candidates.sort_by(|a, b| b.name().len().cmp(&a.name().len()));

    let find_name = domain.trim_end_matches('.');
    Ok(candidates.into_iter().find(|zone| {
        debug!(zone = zone.name(), "Considering hosted zone");
        find_name.contains(zone.name().trim_end_matches('.'))
    }))
}

/// Select the hosted zone for `domain`, creating it if none matches.
///
/// # Errors
///
/// Returns [`IngressDnsError::ZoneResolution`] if zones cannot be listed or
/// created, or if no domain is configured and no zone matches.
pub async fn retrieve_or_create_dns_zone(
    domain: &str,
    zones: &dyn Zones,
) -> Result<Arc<dyn Zone>, IngressDnsError> {
    let zone_error = |reason: String| IngressDnsError::ZoneResolution {
        domain: domain.to_string(),
        reason,
    };

    let found = get_dns_zone(domain, zones)
        .await
        .map_err(|e| zone_error(format!("error querying for DNS zones: {e}")))?;
    if let Some(zone) = found {
        info!(zone = zone.name(), id = zone.id(), "Using existing DNS zone");
        return Ok(zone);
    }

    if domain.is_empty() {
        return Err(zone_error(
            "a domain is required to create a DNS zone automatically".to_string(),
        ));
    }

    info!(domain, "DNS zone not found, creating it");
    let zone = zones
        .new_zone(domain)
        .await
        .map_err(|e| zone_error(format!("failed to create DNS zone: {e}")))?;
    info!(
        zone = zone.name(),
        "DNS zone created. Records will not resolve until the domain is delegated to the DNS provider"
    );
    Ok(zone)
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
