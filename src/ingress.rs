// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Federated ingress domain model.
//!
//! [`FederatedIngress`] is the controller's view of a `networking.k8s.io/v1`
//! `Ingress` in the federation control plane: its identity, whether it is being
//! deleted, its annotations and the load balancer addresses reported locally.
//! The controller only ever reads it.

use crate::constants::GLOBAL_INGRESS_LB_STATUS_ANNOTATION;
use crate::crd::{GlobalLbStatus, LoadBalancerAddress, LoadBalancerStatus};
use crate::errors::IngressDnsError;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::BTreeMap;
use std::fmt;

/// A watched ingress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FederatedIngress {
    /// Namespace of the ingress
    pub namespace: String,
    /// Name of the ingress
    pub name: String,
    /// Tombstone flag: the ingress is being or has been deleted
    pub deleted: bool,
    /// Annotations, including the federation-wide status blob
    pub annotations: BTreeMap<String, String>,
    /// Load balancer addresses from the ingress's own status
    pub local_lb_addresses: Vec<LoadBalancerAddress>,
}

impl FederatedIngress {
    /// Create an ingress with no annotations and no local status.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the federation-wide load balancer status annotation.
    ///
    /// # Errors
    ///
    /// Returns [`IngressDnsError::AnnotationParse`] if the status cannot be serialized.
    pub fn with_global_lb_status(mut self, status: &GlobalLbStatus) -> Result<Self, IngressDnsError> {
        let value = serde_json::to_string(status).map_err(|e| IngressDnsError::AnnotationParse {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            reason: e.to_string(),
        })?;
        self.annotations
            .insert(GLOBAL_INGRESS_LB_STATUS_ANNOTATION.to_string(), value);
        Ok(self)
    }

    /// Set the local load balancer addresses.
    #[must_use]
    pub fn with_local_lb_addresses(mut self, addresses: Vec<LoadBalancerAddress>) -> Self {
        self.local_lb_addresses = addresses;
        self
    }

    /// Mark the ingress as deleted.
    #[must_use]
    pub fn into_tombstone(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Does the ingress report at least one local load balancer endpoint?
    #[must_use]
    pub fn wants_dns_records(&self) -> bool {
        !self.local_lb_addresses.is_empty()
    }

    /// Parse the federation-wide load balancer status annotation.
    ///
    /// Returns `Ok(None)` when the annotation is absent, which means "no data"
    /// rather than an error. A JSON `null`, for the whole annotation or for one
    /// cluster, is no data as well.
    ///
    /// # Errors
    ///
    /// Returns [`IngressDnsError::AnnotationParse`] if the annotation is present
    /// but is not valid JSON of the expected shape.
    pub fn global_lb_status(&self) -> Result<Option<GlobalLbStatus>, IngressDnsError> {
        let Some(raw) = self.annotations.get(GLOBAL_INGRESS_LB_STATUS_ANNOTATION) else {
            return Ok(None);
        };

        let parsed: Option<BTreeMap<String, Option<Vec<LoadBalancerStatus>>>> =
            serde_json::from_str(raw).map_err(|e| IngressDnsError::AnnotationParse {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some(
            parsed
                .unwrap_or_default()
                .into_iter()
                .map(|(cluster, statuses)| (cluster, statuses.unwrap_or_default()))
                .collect(),
        ))
    }
}

impl fmt::Display for FederatedIngress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl From<&Ingress> for FederatedIngress {
    fn from(ingress: &Ingress) -> Self {
        let local_lb_addresses = ingress
            .status
            .as_ref()
            .and_then(|status| status.load_balancer.as_ref())
            .and_then(|lb| lb.ingress.as_ref())
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| LoadBalancerAddress {
                        ip: entry.ip.clone(),
                        hostname: entry.hostname.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            namespace: ingress.namespace().unwrap_or_default(),
            name: ingress.name_any(),
            deleted: ingress.metadata.deletion_timestamp.is_some(),
            annotations: ingress.annotations().clone(),
            local_lb_addresses,
        }
    }
}

impl From<Ingress> for FederatedIngress {
    fn from(ingress: Ingress) -> Self {
        Self::from(&ingress)
    }
}

#[cfg(test)]
#[path = "ingress_tests.rs"]
mod ingress_tests;
