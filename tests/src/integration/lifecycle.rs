//! # Lifecycle Flows
//!
//! Bootstrap, create, transfer, and read through the dispatcher and the
//! JSON-lines host shim.
//!
//! ## Flow Tested:
//!
//! 1. **Bootstrap**: index aggregate plus seeded credentials
//! 2. **Create (P1)** → **Transfer P1 → S1** → **Read (S1 ok, P1 denied)**
//! 3. **Host shim**: the same flow as newline-delimited JSON

#[cfg(test)]
mod tests {
    use crate::fixtures::{args, bootstrap, context_for, fresh_registry, primary, secondary};
    use ml_01_state_store::{InMemoryKVStore, KeyValueStore};
    use ml_02_identity::CertAttributeResolver;
    use ml_03_mortgage_registry::{
        Dispatcher, Mortgage, MortgageRegistry, MortgageRegistryApi, RegistryConfig,
    };
    use node_runtime::container::{NodeConfig, NodeContainer};
    use node_runtime::shim::{serve, StopReason};
    use shared_types::{ErrorKind, InvocationContext, InvocationRequest, InvocationResponse};
    use std::sync::Arc;
    use tokio::io::BufReader;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn dispatcher(
        credentials: &[&str],
    ) -> (
        Arc<InMemoryKVStore>,
        Dispatcher<MortgageRegistry<InMemoryKVStore>, CertAttributeResolver>,
    ) {
        let store = Arc::new(InMemoryKVStore::new());
        let config = RegistryConfig::default();
        bootstrap(&store, &config, credentials);
        let registry = MortgageRegistry::new(Arc::clone(&store), config);
        (store, Dispatcher::new(registry, CertAttributeResolver::new()))
    }

    // =========================================================================
    // REGISTRY SCENARIOS
    // =========================================================================

    #[test]
    fn test_create_transfer_read_scenario() {
        let (_, registry) = fresh_registry(RegistryConfig::default());
        let p1 = primary("P1");
        let s1 = secondary("S1");

        registry.create(&p1, "M1").unwrap();
        let moved = registry
            .transfer(&p1, "M1", &s1.id, s1.affiliation)
            .unwrap();
        assert_eq!(moved.owner, "S1");

        let err = registry.get_details(&p1, "M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let seen = registry.get_details(&s1, "M1").unwrap();
        assert_eq!(
            seen,
            Mortgage {
                id: "M1".into(),
                lendee: "undefined".into(),
                owner: "S1".into()
            }
        );
    }

    #[test]
    fn test_list_follows_ownership_changes() {
        let (_, registry) = fresh_registry(RegistryConfig::default());
        let p1 = primary("P1");
        for id in ["M1", "M2", "M3"] {
            registry.create(&p1, id).unwrap();
        }
        registry
            .transfer(&p1, "M2", "S1", secondary("S1").affiliation)
            .unwrap();

        let p1_ids: Vec<_> = registry
            .list_visible(&p1)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(p1_ids, vec!["M1", "M3"]);

        let s1_ids: Vec<_> = registry
            .list_visible(&secondary("S1"))
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(s1_ids, vec!["M2"]);
    }

    #[test]
    fn test_persisted_layout() {
        let (store, registry) = fresh_registry(RegistryConfig::default());
        registry.create(&primary("P1"), "M1").unwrap();
        registry.create(&primary("P1"), "M2").unwrap();

        assert_eq!(
            store.get("mortIDs").unwrap().unwrap(),
            br#"{"mortIDs":["M1","M2"]}"#.to_vec()
        );
        assert_eq!(
            store.get("M1").unwrap().unwrap(),
            br#"{"mortID":"M1","lendee":"undefined","owner":"P1"}"#.to_vec()
        );
        assert_eq!(store.keys(), vec!["M1", "M2", "mortIDs"]);
    }

    #[test]
    fn test_ping_leaves_state_untouched() {
        let (store, dispatcher) = dispatcher(&[]);
        dispatcher
            .invoke("create_mortgage", &args(&["M1"]), &context_for(&primary("P1")))
            .unwrap();
        let before = store.keys();

        for _ in 0..3 {
            let out = dispatcher
                .invoke("ping", &[], &InvocationContext::new())
                .unwrap();
            assert_eq!(out.payload.as_deref(), Some("Hello, world!"));
        }
        assert_eq!(store.keys(), before);
        assert_eq!(
            store.get("M1").unwrap().unwrap(),
            br#"{"mortID":"M1","lendee":"undefined","owner":"P1"}"#.to_vec()
        );
    }

    // =========================================================================
    // BOOTSTRAP AND CREDENTIALS
    // =========================================================================

    #[test]
    fn test_seeded_credentials_are_queryable() {
        let (_, dispatcher) = dispatcher(&["alice", "cert-alice", "bob", "cert-bob"]);
        let ctx = context_for(&primary("P1"));

        let out = dispatcher
            .query("get_ecert", &args(&["bob"]), &ctx)
            .unwrap();
        assert_eq!(out.payload.as_deref(), Some("cert-bob"));

        let err = dispatcher
            .query("get_ecert", &args(&["carol"]), &ctx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_rebootstrap_keeps_mortgages() {
        let (store, registry) = fresh_registry(RegistryConfig::default());
        registry.create(&primary("P1"), "M1").unwrap();

        bootstrap(&store, &RegistryConfig::default(), &["alice", "cert"]);

        assert_eq!(registry.list_visible(&primary("P1")).unwrap().len(), 1);
        assert!(!registry.check_unique("M1").unwrap());
    }

    // =========================================================================
    // HOST SHIM
    // =========================================================================

    fn line(request: &InvocationRequest) -> String {
        let mut s = serde_json::to_string(request).unwrap();
        s.push('\n');
        s
    }

    #[tokio::test]
    async fn test_shim_end_to_end() {
        let container = NodeContainer::new(NodeConfig::default()).unwrap();
        bootstrap(&container.store, &container.config.registry, &["P1", "cert-p1"]);

        let p1 = context_for(&primary("P1"));
        let s1 = context_for(&secondary("S1"));
        let requests = vec![
            InvocationRequest::query("check_unique_mortgage", args(&["M1"]), p1.clone()),
            InvocationRequest::invoke("create_mortgage", args(&["M1"]), p1.clone()),
            InvocationRequest::query("check_unique_mortgage", args(&["M1"]), p1.clone()),
            InvocationRequest::invoke("pl_to_sl", args(&["S1", "M1"]), p1.clone()),
            InvocationRequest::query("get_mortgage_details", args(&["M1"]), p1.clone()),
            InvocationRequest::query("get_mortgages", vec![], s1),
            InvocationRequest::query("get_ecert", args(&["P1"]), p1),
        ];
        let input: String = requests.iter().map(line).collect();

        let mut output = Vec::new();
        let (summary, reason) = serve(
            &container.dispatcher,
            BufReader::new(input.as_bytes()),
            &mut output,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(reason, StopReason::EndOfInput);
        assert_eq!(summary.requests, 7);
        assert_eq!(summary.failures, 1);

        let responses: Vec<InvocationResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        for (req, resp) in requests.iter().zip(&responses) {
            assert_eq!(req.tx_id, resp.tx_id);
        }

        assert_eq!(responses[0].payload.as_deref(), Some("true"));
        assert!(responses[1].ok && responses[1].payload.is_none());
        assert_eq!(responses[2].payload.as_deref(), Some("false"));
        assert_eq!(responses[2].notice.as_deref(), Some("mortgage is not unique"));
        assert!(responses[3].ok);
        assert_eq!(responses[4].error_kind, Some(ErrorKind::PermissionDenied));
        assert_eq!(
            responses[5].payload.as_deref(),
            Some(r#"[{"mortID":"M1","lendee":"undefined","owner":"S1"}]"#)
        );
        assert_eq!(responses[6].payload.as_deref(), Some("cert-p1"));

        let stats = container.dispatcher.registry().stats();
        assert_eq!(stats.mortgages_created, 1);
        assert_eq!(stats.transfers_completed, 1);
        assert_eq!(stats.permission_denials, 1);
    }
}
