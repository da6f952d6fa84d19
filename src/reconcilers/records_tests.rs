// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `records.rs`

#[cfg(test)]
mod tests {
    use crate::dnsprovider::inmemory::InMemoryProvider;
    use crate::dnsprovider::{DnsProvider, RecordSet, RecordSets, RecordType};
    use crate::errors::IngressDnsError;
    use crate::reconcilers::records::{ensure_dns_rrsets, RrsetOutcome};
    use crate::test_support::{dump, FakeResolver};
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    const NAME: &str = "web.ns.fed.ing.r1.example.com";
    const UPLEVEL: &str = "web.ns.fed.ing.example.com";

    async fn store() -> (InMemoryProvider, Arc<dyn RecordSets>) {
        let provider = InMemoryProvider::with_zones(&["example.com"]);
        let zone = provider.zones().unwrap().list().await.unwrap().remove(0);
        let rrsets = zone.record_sets().unwrap();
        (provider, rrsets)
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn resolver() -> FakeResolver {
        FakeResolver(BTreeMap::from([(
            "lb.example.com".to_string(),
            vec!["198.51.100.7".parse().unwrap()],
        )]))
    }

    async fn seed(rrsets: &dyn RecordSets, rrset: RecordSet) {
        let mut changeset = rrsets.start_changeset();
        changeset.add(rrset);
        changeset.apply().await.unwrap();
    }

    #[tokio::test]
    async fn test_creates_a_record_for_endpoints() {
        let (provider, rrsets) = store().await;
        let endpoints = set(&["198.51.100.2", "lb.example.com", "198.51.100.1"]);

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &endpoints, UPLEVEL)
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Created);
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!(
                "{NAME}:A:180:[198.51.100.1 198.51.100.2 198.51.100.7]"
            )]
        );
        assert_eq!(provider.applied_changesets(), 1);
    }

    #[tokio::test]
    async fn test_creates_cname_without_endpoints() {
        let (_, rrsets) = store().await;

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&[]), UPLEVEL)
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Created);
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!("{NAME}:CNAME:180:[{UPLEVEL}]")]
        );
    }

    #[tokio::test]
    async fn test_nothing_wanted_nothing_written() {
        let (provider, rrsets) = store().await;

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&[]), "")
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Unchanged);
        assert!(dump(rrsets.as_ref()).await.is_empty());
        assert_eq!(provider.applied_changesets(), 0);
    }

    #[tokio::test]
    async fn test_second_pass_is_a_noop() {
        let (provider, rrsets) = store().await;
        let endpoints = set(&["198.51.100.1", "198.51.100.2"]);

        ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &endpoints, UPLEVEL)
            .await
            .unwrap();
        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &endpoints, UPLEVEL)
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Unchanged);
        assert_eq!(provider.applied_changesets(), 1);
    }

    #[tokio::test]
    async fn test_equivalent_record_in_other_order_is_kept() {
        let (provider, rrsets) = store().await;
        seed(
            rrsets.as_ref(),
            RecordSet::new(
                NAME,
                vec!["198.51.100.2".to_string(), "198.51.100.1".to_string()],
                180,
                RecordType::A,
            ),
        )
        .await;

        let outcome = ensure_dns_rrsets(
            rrsets.as_ref(),
            &resolver(),
            NAME,
            &set(&["198.51.100.1", "198.51.100.2"]),
            UPLEVEL,
        )
        .await
        .unwrap();

        assert_eq!(outcome, RrsetOutcome::Unchanged);
        assert_eq!(provider.applied_changesets(), 1);
    }

    #[tokio::test]
    async fn test_a_record_replaced_by_cname() {
        let (provider, rrsets) = store().await;
        let endpoints = set(&["198.51.100.1"]);
        ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &endpoints, UPLEVEL)
            .await
            .unwrap();

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&[]), UPLEVEL)
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Replaced);
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!("{NAME}:CNAME:180:[{UPLEVEL}]")]
        );
        assert_eq!(provider.applied_changesets(), 2);
    }

    #[tokio::test]
    async fn test_changed_addresses_replace_record() {
        let (_, rrsets) = store().await;
        ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&["198.51.100.1"]), UPLEVEL)
            .await
            .unwrap();

        let outcome = ensure_dns_rrsets(
            rrsets.as_ref(),
            &resolver(),
            NAME,
            &set(&["198.51.100.1", "198.51.100.3"]),
            UPLEVEL,
        )
        .await
        .unwrap();

        assert_eq!(outcome, RrsetOutcome::Replaced);
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!("{NAME}:A:180:[198.51.100.1 198.51.100.3]")]
        );
    }

    #[tokio::test]
    async fn test_top_level_record_removed_without_endpoints() {
        let (_, rrsets) = store().await;
        ensure_dns_rrsets(rrsets.as_ref(), &resolver(), UPLEVEL, &set(&["198.51.100.1"]), "")
            .await
            .unwrap();

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), UPLEVEL, &set(&[]), "")
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Removed);
        assert!(dump(rrsets.as_ref()).await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_ttl_is_replaced() {
        let (_, rrsets) = store().await;
        seed(
            rrsets.as_ref(),
            RecordSet::new(NAME, vec![UPLEVEL.to_string()], 300, RecordType::CNAME),
        )
        .await;

        let outcome = ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&[]), UPLEVEL)
            .await
            .unwrap();

        assert_eq!(outcome, RrsetOutcome::Replaced);
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!("{NAME}:CNAME:180:[{UPLEVEL}]")]
        );
    }

    #[tokio::test]
    async fn test_resolution_failure_writes_nothing() {
        let (provider, rrsets) = store().await;
        ensure_dns_rrsets(rrsets.as_ref(), &resolver(), NAME, &set(&[]), UPLEVEL)
            .await
            .unwrap();

        let result = ensure_dns_rrsets(
            rrsets.as_ref(),
            &resolver(),
            NAME,
            &set(&["198.51.100.1", "missing.example.com"]),
            UPLEVEL,
        )
        .await;

        assert!(matches!(result, Err(IngressDnsError::Resolution { .. })));
        assert_eq!(
            dump(rrsets.as_ref()).await,
            vec![format!("{NAME}:CNAME:180:[{UPLEVEL}]")]
        );
        assert_eq!(provider.applied_changesets(), 1);
    }
}
