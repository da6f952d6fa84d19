// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use federated_ingress_dns::context::Context;
use federated_ingress_dns::controller;
use federated_ingress_dns::crd::{
    ClusterTopology, GlobalLbStatus, LoadBalancerAddress, LoadBalancerStatus,
};
use federated_ingress_dns::dnsprovider::inmemory::InMemoryProvider;
use federated_ingress_dns::dnsprovider::RecordSets;
use federated_ingress_dns::errors::IngressDnsError;
use federated_ingress_dns::federation::FederationClient;
use federated_ingress_dns::ingress::FederatedIngress;
use federated_ingress_dns::options::Options;
use federated_ingress_dns::resolver::EndpointResolver;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clap::Parser;
use kube::Client;

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Federation with fixed cluster topologies and no watch events.
#[derive(Default)]
pub struct StaticFederation {
    pub topologies: BTreeMap<String, ClusterTopology>,
    pub ingresses: Mutex<Vec<FederatedIngress>>,
    lookups: AtomicUsize,
}

impl StaticFederation {
    /// Cluster `c1` in `fooregion`/`foozone` and `c2` in `barregion`/`barzone`.
    pub fn foo_and_bar() -> Self {
        Self {
            topologies: BTreeMap::from([
                ("c1".to_string(), ClusterTopology::new(["foozone"], "fooregion")),
                ("c2".to_string(), ClusterTopology::new(["barzone"], "barregion")),
            ]),
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FederationClient for StaticFederation {
    async fn list_ingresses(&self) -> Result<Vec<FederatedIngress>, IngressDnsError> {
        Ok(self.ingresses.lock().unwrap().clone())
    }

    fn watch_ingresses(&self) -> BoxStream<'static, Result<FederatedIngress, IngressDnsError>> {
        stream::pending().boxed()
    }

    async fn cluster_topology(&self, cluster: &str) -> Result<ClusterTopology, IngressDnsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.topologies
            .get(cluster)
            .cloned()
            .ok_or_else(|| IngressDnsError::TopologyLookup {
                cluster: cluster.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// Resolver answering from a fixed table.
#[derive(Default)]
pub struct TableResolver(pub BTreeMap<String, Vec<IpAddr>>);

#[async_trait]
impl EndpointResolver for TableResolver {
    async fn lookup(&self, hostname: &str) -> Result<Vec<IpAddr>, IngressDnsError> {
        self.0
            .get(hostname)
            .cloned()
            .ok_or_else(|| IngressDnsError::Resolution {
                endpoint: hostname.to_string(),
                reason: "no such host".to_string(),
            })
    }
}

/// Options for federation `myfederation` under `domain`.
pub fn options(domain: &str) -> Options {
    Options::try_parse_from([
        "federated-ingress-dns",
        "--domain",
        domain,
        "--federation-name",
        "myfederation",
        "--ingress-dns-suffix",
        "ing",
    ])
    .unwrap()
}

/// Initialize a controller context against an in-memory provider.
pub async fn setup(
    zones: &[&str],
    domain: &str,
    federation: Arc<StaticFederation>,
    resolver: TableResolver,
) -> (Arc<InMemoryProvider>, Context) {
    let provider = Arc::new(InMemoryProvider::with_zones(zones));
    let ctx = controller::initialize(&options(domain), provider.as_ref(), federation, Arc::new(resolver))
        .await
        .unwrap();
    (provider, ctx)
}

/// Global status from `(cluster, addresses)` pairs.
pub fn global_status(clusters: &[(&str, Vec<LoadBalancerAddress>)]) -> GlobalLbStatus {
    clusters
        .iter()
        .map(|(cluster, addresses)| {
            (
                (*cluster).to_string(),
                vec![LoadBalancerStatus {
                    ingress: addresses.clone(),
                }],
            )
        })
        .collect()
}

/// `ingns/ingname` carrying `status` and one local load balancer address.
pub fn federated_ingress(status: &GlobalLbStatus) -> FederatedIngress {
    FederatedIngress::new("ingns", "ingname")
        .with_global_lb_status(status)
        .unwrap()
        .with_local_lb_addresses(vec![LoadBalancerAddress::ip("198.51.100.1")])
}

/// Every published record as `name TYPE ttl data...`, sorted.
pub async fn published(ctx: &Context) -> Vec<String> {
    let rrsets: Arc<dyn RecordSets> = ctx.record_sets().unwrap();
    let mut lines: Vec<String> = rrsets
        .list()
        .await
        .unwrap()
        .iter()
        .map(|rrset| {
            let mut datas = rrset.rrdatas().to_vec();
            datas.sort();
            format!(
                "{} {} {} {}",
                rrset.name(),
                rrset.rrs_type(),
                rrset.ttl(),
                datas.join(",")
            )
        })
        .collect();
    lines.sort();
    lines
}
