// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `federation.rs`

#[cfg(test)]
mod tests {
    use crate::federation::ingress_from_event;
    use k8s_openapi::api::networking::v1::Ingress;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use kube::runtime::watcher::Event;

    fn ingress(name: &str) -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("ingns".to_string()),
                ..ObjectMeta::default()
            },
            ..Ingress::default()
        }
    }

    #[test]
    fn test_apply_events_enqueue_live_ingress() {
        let applied = ingress_from_event(Event::Apply(ingress("a"))).unwrap();
        assert_eq!(applied.name, "a");
        assert!(!applied.deleted);

        let initial = ingress_from_event(Event::InitApply(ingress("b"))).unwrap();
        assert_eq!(initial.name, "b");
        assert!(!initial.deleted);
    }

    #[test]
    fn test_delete_event_enqueues_tombstone() {
        let deleted = ingress_from_event(Event::Delete(ingress("a"))).unwrap();
        assert_eq!(deleted.namespace, "ingns");
        assert!(deleted.deleted);
    }

    #[test]
    fn test_init_markers_are_skipped() {
        assert!(ingress_from_event(Event::Init).is_none());
        assert!(ingress_from_event(Event::InitDone).is_none());
    }
}
