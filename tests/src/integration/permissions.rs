//! # Permission Matrix
//!
//! Every role against every operation, through the dispatcher so that role
//! strings are resolved from certificate attributes.

#[cfg(test)]
mod tests {
    use crate::fixtures::{args, bootstrap, context_for, primary, regulator, secondary};
    use ml_01_state_store::{InMemoryKVStore, KeyValueStore};
    use ml_02_identity::CertAttributeResolver;
    use ml_03_mortgage_registry::{
        Dispatcher, Mortgage, MortgageRegistry, MortgageRegistryApi, RegistryConfig,
    };
    use shared_types::{Affiliation, CallerIdentity, ErrorKind, InvocationContext};
    use std::sync::Arc;

    type TestDispatcher = Dispatcher<MortgageRegistry<InMemoryKVStore>, CertAttributeResolver>;

    fn setup() -> (Arc<InMemoryKVStore>, TestDispatcher) {
        let store = Arc::new(InMemoryKVStore::new());
        let config = RegistryConfig::default();
        bootstrap(&store, &config, &[]);
        let registry = MortgageRegistry::new(Arc::clone(&store), config);
        (store, Dispatcher::new(registry, CertAttributeResolver::new()))
    }

    fn stored(store: &InMemoryKVStore, id: &str) -> Option<Mortgage> {
        store
            .get(id)
            .unwrap()
            .map(|bytes| Mortgage::from_bytes(&bytes).unwrap())
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    #[test]
    fn test_only_primary_lenders_create() {
        for caller in [regulator("R"), secondary("S1")] {
            let (store, d) = setup();
            let err = d
                .invoke("create_mortgage", &args(&["M1"]), &context_for(&caller))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
            assert_eq!(stored(&store, "M1"), None);
            assert!(d.registry().check_unique("M1").unwrap());
        }
    }

    #[test]
    fn test_long_role_names_accepted() {
        let (store, d) = setup();
        let ctx = InvocationContext::for_caller("P1", "primary-lender");
        d.invoke("create_mortgage", &args(&["M1"]), &ctx).unwrap();
        assert_eq!(stored(&store, "M1").unwrap().owner, "P1");
    }

    #[test]
    fn test_unknown_role_is_identity_error() {
        let (store, d) = setup();
        let ctx = InvocationContext::for_caller("X", "auditor");
        let err = d
            .invoke("create_mortgage", &args(&["M1"]), &ctx)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentityResolutionError);
        assert_eq!(stored(&store, "M1"), None);
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    #[test]
    fn test_transfer_matrix_through_registry() {
        let owners = ["P1", "P2"];
        for caller_id in owners {
            for caller_role in Affiliation::ALL {
                for recipient_role in Affiliation::ALL {
                    let (store, d) = setup();
                    d.registry().create(&primary("P1"), "M1").unwrap();

                    let caller = CallerIdentity::new(caller_id, caller_role);
                    let result = d.registry().transfer(&caller, "M1", "R1", recipient_role);

                    let allowed = caller_id == "P1"
                        && caller_role == Affiliation::PrimaryLender
                        && recipient_role == Affiliation::SecondaryLender;
                    let owner = stored(&store, "M1").unwrap().owner;
                    if allowed {
                        assert!(result.is_ok());
                        assert_eq!(owner, "R1");
                    } else {
                        assert_eq!(result.unwrap_err().kind(), ErrorKind::PermissionDenied);
                        assert_eq!(owner, "P1", "{caller} -> {recipient_role}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_pl_to_sl_fixes_recipient_role() {
        let (store, d) = setup();
        let p1 = context_for(&primary("P1"));
        d.invoke("create_mortgage", &args(&["M1"]), &p1).unwrap();

        // The recipient's actual role is irrelevant; the call always targets
        // a secondary lender
        d.invoke("pl_to_sl", &args(&["P2", "M1"]), &p1).unwrap();
        assert_eq!(stored(&store, "M1").unwrap().owner, "P2");
    }

    #[test]
    fn test_secondary_lender_cannot_pass_on() {
        let (store, d) = setup();
        let p1 = context_for(&primary("P1"));
        let s1 = context_for(&secondary("S1"));
        d.invoke("create_mortgage", &args(&["M1"]), &p1).unwrap();
        d.invoke("pl_to_sl", &args(&["S1", "M1"]), &p1).unwrap();

        let err = d
            .invoke("pl_to_sl", &args(&["S2", "M1"]), &s1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(stored(&store, "M1").unwrap().owner, "S1");
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[test]
    fn test_details_owner_only_for_every_role() {
        let (_, d) = setup();
        d.registry().create(&primary("P1"), "M1").unwrap();

        assert!(d.registry().get_details(&primary("P1"), "M1").is_ok());
        for other in [primary("P2"), secondary("S1"), regulator("R")] {
            let err = d.registry().get_details(&other, "M1").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        }
    }

    #[test]
    fn test_regulator_sees_nothing_in_list() {
        let (_, d) = setup();
        d.registry().create(&primary("P1"), "M1").unwrap();
        d.registry().create(&primary("P2"), "M2").unwrap();

        let out = d
            .query("get_mortgages", &[], &context_for(&regulator("R")))
            .unwrap();
        assert_eq!(out.payload.as_deref(), Some("[]"));
    }

    #[test]
    fn test_denials_are_counted() {
        let (_, d) = setup();
        d.registry().create(&primary("P1"), "M1").unwrap();
        let _ = d.registry().create(&secondary("S1"), "M2");
        let _ = d.registry().get_details(&regulator("R"), "M1");
        let _ = d
            .registry()
            .transfer(&primary("P2"), "M1", "S1", Affiliation::SecondaryLender);
        assert_eq!(d.registry().stats().permission_denials, 3);
    }
}
