// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::crd::*;
    use kube::CustomResourceExt;

    #[test]
    fn test_cluster_crd_identity() {
        let crd = Cluster::crd();
        assert_eq!(crd.spec.group, "federation");
        assert_eq!(crd.spec.names.kind, "Cluster");
        assert_eq!(crd.spec.scope, "Cluster");
        assert_eq!(crd.spec.versions[0].name, "v1beta1");
    }

    #[test]
    fn test_cluster_topology_from_status() {
        let cluster: Cluster = serde_json::from_value(serde_json::json!({
            "apiVersion": "federation/v1beta1",
            "kind": "Cluster",
            "metadata": { "name": "c1" },
            "spec": {
                "serverAddressByClientCIDRs": [
                    { "clientCIDR": "0.0.0.0/0", "serverAddress": "https://c1.example.com" }
                ],
                "secretRef": { "name": "c1-credentials" }
            },
            "status": { "zones": ["foozone", "foozone-b"], "region": "fooregion" }
        }))
        .unwrap();

        assert_eq!(
            cluster.spec.server_address_by_client_cidrs[0].server_address,
            "https://c1.example.com"
        );
        assert_eq!(
            cluster.topology(),
            ClusterTopology::new(["foozone", "foozone-b"], "fooregion")
        );
    }

    #[test]
    fn test_cluster_without_status_has_empty_topology() {
        let cluster = Cluster::new("c1", ClusterSpec::default());
        let topology = cluster.topology();
        assert!(topology.zones.is_empty());
        assert!(topology.region.is_empty());
    }

    #[test]
    fn test_shares_zone_compares_names_not_clusters() {
        let c1 = ClusterTopology::new(["foozone"], "fooregion");
        let c3 = ClusterTopology::new(["otherzone", "foozone"], "otherregion");
        let c2 = ClusterTopology::new(["barzone"], "barregion");

        assert!(c1.shares_zone_with(&c3));
        assert!(!c1.shares_zone_with(&c2));
        assert!(!c1.shares_zone_with(&ClusterTopology::default()));
    }

    #[test]
    fn test_endpoint_prefers_ip() {
        let both = LoadBalancerAddress {
            ip: Some("198.51.100.1".to_string()),
            hostname: Some("lb.example.com".to_string()),
        };
        assert_eq!(both.endpoint(), Some("198.51.100.1"));

        let empty_ip = LoadBalancerAddress {
            ip: Some(String::new()),
            hostname: Some("lb.example.com".to_string()),
        };
        assert_eq!(empty_ip.endpoint(), Some("lb.example.com"));

        assert_eq!(LoadBalancerAddress::default().endpoint(), None);
    }

    #[test]
    fn test_global_lb_status_accepts_both_field_names() {
        let raw = r#"{
            "c1": [{"ingress": [{"ip": "198.51.100.1"}, {"hostname": "lb.example.com"}]}],
            "c2": [{"addresses": [{"ip": "198.51.100.2"}]}],
            "c3": [{}]
        }"#;
        let status: GlobalLbStatus = serde_json::from_str(raw).unwrap();

        assert_eq!(
            status["c1"][0].ingress,
            vec![
                LoadBalancerAddress::ip("198.51.100.1"),
                LoadBalancerAddress::hostname("lb.example.com"),
            ]
        );
        assert_eq!(
            status["c2"][0].ingress,
            vec![LoadBalancerAddress::ip("198.51.100.2")]
        );
        assert!(status["c3"][0].ingress.is_empty());
    }

    #[test]
    fn test_global_lb_status_serializes_compactly() {
        let mut status = GlobalLbStatus::new();
        status.insert(
            "c1".to_string(),
            vec![LoadBalancerStatus {
                ingress: vec![LoadBalancerAddress::ip("198.51.100.1")],
            }],
        );

        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"c1":[{"ingress":[{"ip":"198.51.100.1"}]}]}"#
        );
    }
}
