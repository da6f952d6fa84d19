// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Endpoint address resolution.
//!
//! Load balancers report either an IP address or a hostname. A records need
//! IPv4 addresses, so hostnames are looked up before publishing. Literal IPv4
//! addresses are used as they are.

use crate::errors::IngressDnsError;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Hostname to address lookup.
#[async_trait]
pub trait EndpointResolver: Send + Sync {
    /// Look up the addresses of `hostname`.
    async fn lookup(&self, hostname: &str) -> Result<Vec<IpAddr>, IngressDnsError>;
}

/// Resolver backed by the system resolver through tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl EndpointResolver for SystemResolver {
    async fn lookup(&self, hostname: &str) -> Result<Vec<IpAddr>, IngressDnsError> {
        // lookup_host needs a port; it is discarded
        let addrs = tokio::net::lookup_host((hostname, 0))
            .await
            .map_err(|e| IngressDnsError::Resolution {
                endpoint: hostname.to_string(),
                reason: e.to_string(),
            })?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Resolve a set of endpoints into sorted, de-duplicated A record data.
///
/// Literal IPv4 addresses are kept as they are and literal IPv6 addresses are
/// skipped. Hostnames are looked up and contribute their IPv4 addresses. The
/// first failed lookup aborts the whole resolution, so no partial record is
/// ever published.
///
/// # Errors
///
/// Returns [`IngressDnsError::Resolution`] if a lookup fails, a hostname has no
/// IPv4 address, or no IPv4 address is left at all.
pub async fn resolve_endpoints<'a, I>(
    resolver: &dyn EndpointResolver,
    endpoints: I,
) -> Result<Vec<String>, IngressDnsError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut resolved = BTreeSet::new();

    let mut skipped = Vec::new();

    for endpoint in endpoints {
        match endpoint.parse::<IpAddr>() {
            Ok(IpAddr::V4(addr)) => {
                resolved.insert(addr.to_string());
                continue;
            }
            Ok(IpAddr::V6(_)) => {
                warn!(endpoint = %endpoint, "Skipping IPv6 endpoint, A records hold IPv4 only");
                skipped.push(endpoint.as_str());
                continue;
            }
            Err(_) => {}
        }

        let addrs = resolver.lookup(endpoint).await?;
        let v4: Vec<String> = addrs
            .iter()
            .filter(|addr| addr.is_ipv4())
            .map(ToString::to_string)
            .collect();
        if v4.is_empty() {
            return Err(IngressDnsError::Resolution {
                endpoint: endpoint.clone(),
                reason: "no IPv4 address found".to_string(),
            });
        }

        debug!(endpoint = %endpoint, addresses = ?v4, "Resolved load balancer hostname");
        resolved.extend(v4);
    }

    if resolved.is_empty() && !skipped.is_empty() {
        return Err(IngressDnsError::Resolution {
            endpoint: skipped.join(","),
            reason: "no IPv4 address found".to_string(),
        });
    }

    Ok(resolved.into_iter().collect())
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
