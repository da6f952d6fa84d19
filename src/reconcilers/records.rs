// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record set convergence for one DNS name.
//!
//! [`ensure_dns_rrsets`] makes the record sets published under a name match
//! the desired state, idempotently and with the fewest provider mutations:
//!
//! | Healthy endpoints | Alias target | Desired record       |
//! |-------------------|--------------|----------------------|
//! | non-empty         | any          | `A` with the resolved addresses |
//! | empty             | non-empty    | `CNAME` to the alias target     |
//! | empty             | empty        | no record                       |
//!
//! When an existing record set is already equivalent to the desired one,
//! nothing is written. Otherwise every existing record set is removed and the
//! desired one added in a single changeset.

use crate::constants::MIN_DNS_TTL_SECS;
use crate::dnsprovider::{find_equivalent, RecordSet, RecordSets, RecordType};
use crate::errors::{IngressDnsError, ProviderError};
use crate::resolver::{resolve_endpoints, EndpointResolver};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What [`ensure_dns_rrsets`] did to the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RrsetOutcome {
    /// Published state already matched, no changeset applied
    Unchanged,
    /// No record existed, the desired one was added
    Created,
    /// Existing records were replaced by the desired one
    Replaced,
    /// Existing records were removed, nothing replaces them
    Removed,
}

impl RrsetOutcome {
    /// True if a changeset was applied.
    #[must_use]
    pub fn mutated(self) -> bool {
        self != Self::Unchanged
    }
}

fn provider_error(dns_name: &str) -> impl FnOnce(ProviderError) -> IngressDnsError + '_ {
    move |source| IngressDnsError::Provider {
        dns_name: dns_name.to_string(),
        source,
    }
}

/// Desired record set for `dns_name`, or `None` when no record should exist.
async fn desired_rrset(
    rrsets: &dyn RecordSets,
    resolver: &dyn EndpointResolver,
    dns_name: &str,
    endpoints: &BTreeSet<String>,
    uplevel_cname: &str,
) -> Result<Option<RecordSet>, IngressDnsError> {
    if endpoints.is_empty() {
        if uplevel_cname.is_empty() {
            return Ok(None);
        }
        return Ok(Some(rrsets.new_record_set(
            dns_name,
            vec![uplevel_cname.to_string()],
            MIN_DNS_TTL_SECS,
            RecordType::CNAME,
        )));
    }

    let addresses = resolve_endpoints(resolver, endpoints).await?;
    Ok(Some(rrsets.new_record_set(
        dns_name,
        addresses,
        MIN_DNS_TTL_SECS,
        RecordType::A,
    )))
}

/// Converge the record sets of `dns_name`.
///
/// `endpoints` are the healthy endpoints at this level (IPs or hostnames);
/// `uplevel_cname` is the name one level up, or empty at the top level.
/// Hostnames are resolved before anything is written; a failed resolution
/// leaves the published records untouched.
///
/// # Errors
///
/// Returns [`IngressDnsError::Resolution`] if an endpoint cannot be resolved
/// and [`IngressDnsError::Provider`] if the provider fails.
pub async fn ensure_dns_rrsets(
    rrsets: &dyn RecordSets,
    resolver: &dyn EndpointResolver,
    dns_name: &str,
    endpoints: &BTreeSet<String>,
    uplevel_cname: &str,
) -> Result<RrsetOutcome, IngressDnsError> {
    let existing = rrsets
        .get(dns_name)
        .await
        .map_err(provider_error(dns_name))?;
    let desired = desired_rrset(rrsets, resolver, dns_name, endpoints, uplevel_cname).await?;

    if existing.is_empty() {
        let Some(desired) = desired else {
            debug!(dns_name, "No record wanted and none exists");
            return Ok(RrsetOutcome::Unchanged);
        };

        debug!(dns_name, rrset = %desired, "No record set found, adding");
        let mut changeset = rrsets.start_changeset();
        changeset.add(desired.clone());
        changeset.apply().await.map_err(provider_error(dns_name))?;

        info!(dns_name, rrset = %desired, "Created DNS record set");
        return Ok(RrsetOutcome::Created);
    }

    if let Some(found) = desired
        .as_ref()
        .and_then(|wanted| find_equivalent(&existing, wanted))
    {
        debug!(dns_name, rrset = %found, "Existing record set is equivalent, nothing to do");
        return Ok(RrsetOutcome::Unchanged);
    }

    debug!(
        dns_name,
        existing = ?existing,
        desired = ?desired,
        "Existing record sets differ from desired state, replacing"
    );
    let mut changeset = rrsets.start_changeset();
    for rrset in existing {
        changeset.remove(rrset);
    }
    let outcome = match desired {
        Some(desired) => {
            changeset.add(desired);
            RrsetOutcome::Replaced
        }
        None => RrsetOutcome::Removed,
    };
    changeset.apply().await.map_err(provider_error(dns_name))?;

    info!(dns_name, outcome = ?outcome, "Updated DNS record sets");
    Ok(outcome)
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
