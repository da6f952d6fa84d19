// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access to the federation control plane.
//!
//! The controller needs three things from the federation API server: the list
//! of ingresses, a stream of ingress changes, and the topology (zones and
//! region) of a member cluster. [`FederationClient`] is the seam between the
//! controller and the API server so reconciliation can be driven by fakes in
//! tests; [`KubeFederationClient`] is the implementation backed by `kube`.

use crate::crd::{Cluster, ClusterTopology};
use crate::errors::IngressDnsError;
use crate::ingress::FederatedIngress;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::ListParams;
use kube::runtime::watcher::Event;
use kube::runtime::{watcher, WatchStreamExt};
use kube::{Api, Client};
use tracing::debug;

/// Federation control plane operations used by the controller.
#[async_trait]
pub trait FederationClient: Send + Sync {
    /// List every ingress in every namespace.
    async fn list_ingresses(&self) -> Result<Vec<FederatedIngress>, IngressDnsError>;

    /// Stream of changed ingresses.
    ///
    /// Added and updated ingresses are yielded as they are; deleted ingresses
    /// are yielded with their tombstone flag set.
    fn watch_ingresses(&self) -> BoxStream<'static, Result<FederatedIngress, IngressDnsError>>;

    /// Zones and region of a member cluster.
    async fn cluster_topology(&self, cluster: &str) -> Result<ClusterTopology, IngressDnsError>;
}

/// [`FederationClient`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeFederationClient {
    client: Client,
}

impl KubeFederationClient {
    /// Wrap a Kubernetes client connected to the federation API server.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Convert a watcher event into the ingress to enqueue, if any.
pub(crate) fn ingress_from_event(event: Event<Ingress>) -> Option<FederatedIngress> {
    match event {
        Event::Apply(ingress) | Event::InitApply(ingress) => Some(FederatedIngress::from(ingress)),
        Event::Delete(ingress) => Some(FederatedIngress::from(ingress).into_tombstone()),
        Event::Init | Event::InitDone => None,
    }
}

#[async_trait]
impl FederationClient for KubeFederationClient {
    async fn list_ingresses(&self) -> Result<Vec<FederatedIngress>, IngressDnsError> {
        let api: Api<Ingress> = Api::all(self.client.clone());
        let ingresses = api.list(&ListParams::default()).await?;
        Ok(ingresses.items.iter().map(FederatedIngress::from).collect())
    }

    fn watch_ingresses(&self) -> BoxStream<'static, Result<FederatedIngress, IngressDnsError>> {
        let api: Api<Ingress> = Api::all(self.client.clone());
        watcher(api, watcher::Config::default())
            .default_backoff()
            .filter_map(|event| async move {
                match event {
                    Ok(event) => ingress_from_event(event).map(Ok),
                    Err(e) => Some(Err(IngressDnsError::from(e))),
                }
            })
            .boxed()
    }

    async fn cluster_topology(&self, cluster: &str) -> Result<ClusterTopology, IngressDnsError> {
        let api: Api<Cluster> = Api::all(self.client.clone());
        let found = api
            .get(cluster)
            .await
            .map_err(|e| IngressDnsError::TopologyLookup {
                cluster: cluster.to_string(),
                reason: e.to_string(),
            })?;

        let topology = found.topology();
        debug!(cluster, zones = ?topology.zones, region = %topology.region, "Fetched cluster topology");
        Ok(topology)
    }
}

#[cfg(test)]
#[path = "federation_tests.rs"]
mod federation_tests;
