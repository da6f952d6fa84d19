// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-process fakes shared by the unit tests.

use crate::context::Context;
use crate::crd::{ClusterTopology, GlobalLbStatus, LoadBalancerAddress, LoadBalancerStatus};
use crate::dnsprovider::inmemory::InMemoryProvider;
use crate::dnsprovider::{DnsProvider, RecordSet, RecordSets, Zone};
use crate::errors::IngressDnsError;
use crate::federation::FederationClient;
use crate::ingress::FederatedIngress;
use crate::options::DnsSettings;
use crate::resolver::EndpointResolver;
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Federation client answering from fixed data.
#[derive(Default)]
pub struct FakeFederation {
    pub topologies: BTreeMap<String, ClusterTopology>,
    pub ingresses: Mutex<Vec<FederatedIngress>>,
    pub events: Mutex<Vec<FederatedIngress>>,
    pub topology_lookups: AtomicUsize,
}

impl FakeFederation {
    /// Clusters c1 (fooregion/foozone) and c2 (barregion/barzone).
    pub fn two_clusters() -> Self {
        Self {
            topologies: BTreeMap::from([
                ("c1".to_string(), ClusterTopology::new(["foozone"], "fooregion")),
                ("c2".to_string(), ClusterTopology::new(["barzone"], "barregion")),
            ]),
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> usize {
        self.topology_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FederationClient for FakeFederation {
    async fn list_ingresses(&self) -> Result<Vec<FederatedIngress>, IngressDnsError> {
        Ok(self.ingresses.lock().unwrap().clone())
    }

    fn watch_ingresses(&self) -> BoxStream<'static, Result<FederatedIngress, IngressDnsError>> {
        let events: Vec<_> = self.events.lock().unwrap().drain(..).map(Ok).collect();
        stream::iter(events).chain(stream::pending()).boxed()
    }

    async fn cluster_topology(&self, cluster: &str) -> Result<ClusterTopology, IngressDnsError> {
        self.topology_lookups.fetch_add(1, Ordering::SeqCst);
        self.topologies
            .get(cluster)
            .cloned()
            .ok_or_else(|| IngressDnsError::TopologyLookup {
                cluster: cluster.to_string(),
                reason: format!("clusters.federation \"{cluster}\" not found"),
            })
    }
}

/// Resolver answering from a fixed table.
#[derive(Default)]
pub struct FakeResolver(pub BTreeMap<String, Vec<IpAddr>>);

#[async_trait]
impl EndpointResolver for FakeResolver {
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

/// Zone that cannot manage record sets.
#[derive(Debug)]
pub struct ReadOnlyZone;

impl Zone for ReadOnlyZone {
    fn name(&self) -> &str {
        "example.com"
    }

    fn id(&self) -> &str {
        "read-only"
    }

    fn record_sets(&self) -> Option<Arc<dyn RecordSets>> {
        None
    }
}

pub fn settings() -> DnsSettings {
    DnsSettings::new("myfederation", "federation.example.com", "ing")
}

/// In-memory provider with an `example.com` zone and a context publishing into it.
pub async fn context(federation: Arc<FakeFederation>) -> (Arc<InMemoryProvider>, Context) {
    let provider = Arc::new(InMemoryProvider::with_zones(&["example.com"]));
    let zone = provider
        .zones()
        .unwrap()
        .list()
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let ctx = Context {
        zone,
        federation,
        resolver: Arc::new(FakeResolver::default()),
        settings: settings(),
    };
    (provider, ctx)
}

/// Global status with one load balancer status per cluster listing `ips`.
pub fn lb_status(clusters: &[(&str, &[&str])]) -> GlobalLbStatus {
    clusters
        .iter()
        .map(|(cluster, ips)| {
            (
                (*cluster).to_string(),
                vec![LoadBalancerStatus {
                    ingress: ips.iter().map(|ip| LoadBalancerAddress::ip(*ip)).collect(),
                }],
            )
        })
        .collect()
}

/// `ingns/ingname` with the given global status and one local address.
pub fn ingress(status: &GlobalLbStatus) -> FederatedIngress {
    FederatedIngress::new("ingns", "ingname")
        .with_global_lb_status(status)
        .unwrap()
        .with_local_lb_addresses(vec![LoadBalancerAddress::ip("198.51.100.1")])
}

/// Every record set in the zone as `name:TYPE:ttl:[sorted data]`, sorted.
pub async fn dump(rrsets: &dyn RecordSets) -> Vec<String> {
    let mut records: Vec<String> = rrsets
        .list()
        .await
        .unwrap()
        .iter()
        .map(describe)
        .collect();
    records.sort();
    records
}

fn describe(rrset: &RecordSet) -> String {
    let mut datas = rrset.rrdatas().to_vec();
    datas.sort();
    format!(
        "{}:{}:{}:[{}]",
        rrset.name(),
        rrset.rrs_type(),
        rrset.ttl(),
        datas.join(" ")
    )
}
