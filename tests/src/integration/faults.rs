//! # Fault Injection
//!
//! Store failures and corrupt bytes. Failed mutations must leave no
//! observable change.

#[cfg(test)]
mod tests {
    use crate::fixtures::{bootstrap, primary, secondary, FaultyStore};
    use ml_01_state_store::KeyValueStore;
    use ml_03_mortgage_registry::{
        Bootstrap, BootstrapError, Mortgage, MortgageRegistry, MortgageRegistryApi,
        RegistryConfig,
    };
    use shared_types::{Affiliation, ErrorKind};
    use std::sync::Arc;

    fn setup() -> (Arc<FaultyStore>, MortgageRegistry<FaultyStore>) {
        let store = Arc::new(FaultyStore::new());
        let config = RegistryConfig::default();
        bootstrap(&store, &config, &[]);
        let registry = MortgageRegistry::new(Arc::clone(&store), config);
        (store, registry)
    }

    fn owner_of(store: &FaultyStore, id: &str) -> String {
        Mortgage::from_bytes(&store.peek(id).unwrap()).unwrap().owner
    }

    // =========================================================================
    // WRITE FAILURES
    // =========================================================================

    #[test]
    fn test_record_write_failure_leaves_nothing() {
        let (store, registry) = setup();
        store.fail_writes_on("M1");

        let err = registry.create(&primary("P1"), "M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreWriteError);
        assert_eq!(store.peek("M1"), None);
        assert_eq!(store.peek("mortIDs"), Some(br#"{"mortIDs":[]}"#.to_vec()));
        assert_eq!(registry.stats().mortgages_created, 0);
    }

    #[test]
    fn test_index_write_failure_surfaces() {
        let (store, registry) = setup();
        store.fail_writes_on("mortIDs");

        let err = registry.create(&primary("P1"), "M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreWriteError);
        assert_eq!(store.peek("mortIDs"), Some(br#"{"mortIDs":[]}"#.to_vec()));
        assert_eq!(store.peek("M1"), None);
        assert_eq!(registry.stats().mortgages_created, 0);

        // The id was not consumed
        store.heal();
        assert!(registry.check_unique("M1").unwrap());
        registry.create(&primary("P1"), "M1").unwrap();
        assert_eq!(registry.list_visible(&primary("P1")).unwrap().len(), 1);
    }

    #[test]
    fn test_transfer_write_failure_keeps_owner() {
        let (store, registry) = setup();
        registry.create(&primary("P1"), "M1").unwrap();
        store.fail_writes_on("M1");

        let err = registry
            .transfer(&primary("P1"), "M1", "S1", Affiliation::SecondaryLender)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreWriteError);
        assert_eq!(owner_of(&store, "M1"), "P1");

        store.heal();
        registry
            .transfer(&primary("P1"), "M1", "S1", Affiliation::SecondaryLender)
            .unwrap();
        assert_eq!(owner_of(&store, "M1"), "S1");
    }

    #[test]
    fn test_bootstrap_index_write_failure_is_fatal() {
        let store = Arc::new(FaultyStore::new());
        store.fail_writes_on("mortIDs");
        let err = Bootstrap::new(Arc::clone(&store), &RegistryConfig::default())
            .run(&["alice".to_string(), "cert".to_string()])
            .unwrap_err();
        assert!(matches!(err, BootstrapError::IndexInit { .. }));
        assert_eq!(store.peek("alice"), None);
    }

    #[test]
    fn test_bootstrap_credential_write_failure_is_fatal() {
        let store = Arc::new(FaultyStore::new());
        store.fail_writes_on("bob");
        let err = Bootstrap::new(Arc::clone(&store), &RegistryConfig::default())
            .run(&[
                "alice".to_string(),
                "a".to_string(),
                "bob".to_string(),
                "b".to_string(),
            ])
            .unwrap_err();
        assert!(matches!(err, BootstrapError::CredentialSeed { ref name, .. } if name == "bob"));
    }

    // =========================================================================
    // READ FAILURES
    // =========================================================================

    #[test]
    fn test_unique_check_read_failure() {
        let (store, registry) = setup();
        store.fail_reads_on("M1");
        let err = registry.check_unique("M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreReadError);
    }

    #[test]
    fn test_list_aborts_when_one_record_unreadable() {
        let (store, registry) = setup();
        registry.create(&primary("P1"), "M1").unwrap();
        registry.create(&primary("P2"), "M2").unwrap();
        store.fail_reads_on("M2");

        // Even a caller who owns nothing unreadable gets the abort
        let err = registry.list_visible(&primary("P1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RetrievalFailure);
    }

    #[test]
    fn test_index_read_failure() {
        let (store, registry) = setup();
        store.fail_reads_on("mortIDs");
        let err = registry.list_visible(&primary("P1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreReadError);
    }

    // =========================================================================
    // CORRUPTION
    // =========================================================================

    #[test]
    fn test_corrupt_record() {
        let (store, registry) = setup();
        registry.create(&primary("P1"), "M1").unwrap();
        store.put("M1", b"{\"mortID\":").unwrap();

        let err = registry.get_details(&primary("P1"), "M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptRecord);
        let err = registry.list_visible(&secondary("S1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RetrievalFailure);
        // Still occupies the id
        assert!(!registry.check_unique("M1").unwrap());
    }

    #[test]
    fn test_corrupt_index_blocks_create_and_list() {
        let (store, registry) = setup();
        store.put("mortIDs", b"[\"M1\"]").unwrap();

        assert_eq!(
            registry.list_visible(&primary("P1")).unwrap_err().kind(),
            ErrorKind::CorruptIndex
        );
        assert_eq!(
            registry.create(&primary("P1"), "M9").unwrap_err().kind(),
            ErrorKind::CorruptIndex
        );
        assert_eq!(store.peek("M9"), None);
        assert_eq!(store.peek("mortIDs"), Some(b"[\"M1\"]".to_vec()));
    }

    #[test]
    fn test_missing_index_is_not_found() {
        let store = Arc::new(FaultyStore::new());
        let registry = MortgageRegistry::new(Arc::clone(&store), RegistryConfig::default());
        assert_eq!(
            registry.list_visible(&primary("P1")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_create_without_index_leaves_no_record() {
        let store = Arc::new(FaultyStore::new());
        let config = RegistryConfig::default();
        let registry = MortgageRegistry::new(Arc::clone(&store), config.clone());

        let err = registry.create(&primary("P1"), "M1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.peek("M1"), None);

        // After bootstrap the same id is accepted and listed
        bootstrap(&store, &config, &[]);
        registry.create(&primary("P1"), "M1").unwrap();
        let ids: Vec<_> = registry
            .list_visible(&primary("P1"))
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["M1"]);
    }

    #[test]
    fn test_bootstrap_rejects_index_key_as_name() {
        let store = Arc::new(FaultyStore::new());
        let config = RegistryConfig::default();
        let err = Bootstrap::new(Arc::clone(&store), &config)
            .run(&["mortIDs".to_string(), "cert".to_string()])
            .unwrap_err();
        assert!(matches!(err, BootstrapError::ReservedName { .. }));
        assert_eq!(store.peek("mortIDs"), None);
    }
}
