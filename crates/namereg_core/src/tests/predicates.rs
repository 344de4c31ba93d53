use crate::{
    oracle::OracleCall,
    safety::{
        api::{NameRecord, NamespaceRecord, SafetyRequest},
        error::RegistryError,
        init_safety,
        services::predicates::MAX_NAMES_PER_ADDRESS,
    },
};

use super::fixtures::{
    ALICE, BOB, NAMESPACE_OWNER, registry_with_holdings, sample_registry,
};

#[tokio::test]
async fn integration_name_availability() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    let safety = init_safety(oracle.clone());

    name_available!(safety, "alice.id", false);
    name_available!(safety, "carol.id", true);

    // Record contents are irrelevant, existence is enough
    oracle.register_name("ghost.id", NameRecord::default());
    name_available!(safety, "ghost.id", false);
}

#[tokio::test]
async fn integration_namespace_availability() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let safety = init_safety(sample_registry());

    assert_decision!(safety, SafetyRequest::IsNamespaceAvailable("id".to_string()), false);
    assert_decision!(safety, SafetyRequest::IsNamespaceAvailable("btc".to_string()), false);
    assert_decision!(safety, SafetyRequest::IsNamespaceAvailable("eth".to_string()), true);
}

#[tokio::test]
async fn integration_ownership() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let safety = init_safety(sample_registry());

    owns_name!(safety, "alice.id", ALICE, true);
    owns_name!(safety, "alice.id", BOB, false);
    owns_name!(safety, "alice.id", "addr-alic", false);
    owns_name!(safety, "carol.id", ALICE, false);
}

#[tokio::test]
async fn integration_revealed_namespace() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let safety = init_safety(sample_registry());

    let revealed_by = |namespace: &str, address: &str| SafetyRequest::RevealedNamespace {
        namespace: namespace.to_string(),
        address: address.to_string(),
    };
    assert_decision!(safety, revealed_by("btc", NAMESPACE_OWNER), true);
    assert_decision!(safety, revealed_by("id", NAMESPACE_OWNER), true);
    assert_decision!(safety, revealed_by("btc", ALICE), false);
    assert_decision!(safety, revealed_by("eth", NAMESPACE_OWNER), false);
}

#[tokio::test]
async fn integration_namespace_lifecycle() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    let safety = init_safety(oracle.clone());

    assert_decision!(safety, SafetyRequest::NamespaceIsReady("id".to_string()), true);
    assert_decision!(safety, SafetyRequest::NamespaceIsRevealed("id".to_string()), false);
    assert_decision!(safety, SafetyRequest::NamespaceIsReady("btc".to_string()), false);
    assert_decision!(safety, SafetyRequest::NamespaceIsRevealed("btc".to_string()), true);

    // A missing namespace is neither ready nor revealed
    assert_decision!(safety, SafetyRequest::NamespaceIsReady("eth".to_string()), false);
    assert_decision!(safety, SafetyRequest::NamespaceIsRevealed("eth".to_string()), false);

    assert!(oracle.launch_namespace("btc"));
    assert_decision!(safety, SafetyRequest::NamespaceIsReady("btc".to_string()), true);
    assert_decision!(safety, SafetyRequest::NamespaceIsRevealed("btc".to_string()), false);
}

#[tokio::test]
async fn integration_can_receive_name_cap() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let below_cap = init_safety(registry_with_holdings(ALICE, MAX_NAMES_PER_ADDRESS - 1, 5));
    can_receive_name!(below_cap, ALICE, true);

    let at_cap = init_safety(registry_with_holdings(ALICE, MAX_NAMES_PER_ADDRESS, 0));
    can_receive_name!(at_cap, ALICE, false);

    let only_invalid = init_safety(registry_with_holdings(ALICE, 0, 40));
    can_receive_name!(only_invalid, ALICE, true);

    let nothing = init_safety(registry_with_holdings(ALICE, 0, 0));
    can_receive_name!(nothing, BOB, true);
}

#[tokio::test]
async fn integration_faults_propagate() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    let safety = init_safety(oracle.clone());
    let fault = RegistryError::OracleTransport("connection reset".to_string());

    oracle.inject_fault(OracleCall::NameInfo, fault.clone());
    assert_fault!(safety, SafetyRequest::IsNameAvailable("carol.id".to_string()), fault.clone());
    assert_fault!(
        safety,
        SafetyRequest::OwnsName { name: "alice.id".to_string(), address: ALICE.to_string() },
        fault.clone()
    );
    assert_fault!(safety, SafetyRequest::IsInGracePeriod("alice.id".to_string()), fault.clone());
    // Namespace lookups are unaffected
    assert_decision!(safety, SafetyRequest::NamespaceIsReady("id".to_string()), true);

    oracle.clear_faults();
    oracle.inject_fault(OracleCall::NamespaceInfo, RegistryError::UnexpectedOracleResponse);
    for request in [
        SafetyRequest::IsNamespaceAvailable("eth".to_string()),
        SafetyRequest::RevealedNamespace {
            namespace: "btc".to_string(),
            address: NAMESPACE_OWNER.to_string(),
        },
        SafetyRequest::NamespaceIsReady("id".to_string()),
        SafetyRequest::NamespaceIsRevealed("btc".to_string()),
    ] {
        assert_fault!(safety, request, RegistryError::UnexpectedOracleResponse);
    }

    oracle.clear_faults();
    oracle.inject_fault(OracleCall::NamesOwned, RegistryError::OracleTimeout);
    assert_fault!(
        safety,
        SafetyRequest::AddressCanReceiveName(ALICE.to_string()),
        RegistryError::OracleTimeout
    );
}

#[tokio::test]
async fn integration_not_found_kinds_are_not_interchangeable() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    let safety = init_safety(oracle.clone());

    // A namespace lookup answering "name not found" is a fault, and vice versa
    oracle.inject_fault(
        OracleCall::NamespaceInfo,
        RegistryError::NameNotFound("alice.id".to_string()),
    );
    assert_fault!(
        safety,
        SafetyRequest::IsNamespaceAvailable("eth".to_string()),
        RegistryError::NameNotFound("alice.id".to_string())
    );

    oracle.clear_faults();
    oracle.inject_fault(OracleCall::NameInfo, RegistryError::NamespaceNotFound("id".to_string()));
    assert_fault!(
        safety,
        SafetyRequest::IsNameAvailable("carol.id".to_string()),
        RegistryError::NamespaceNotFound("id".to_string())
    );
}

#[tokio::test]
async fn integration_decisions_are_not_cached() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    let safety = init_safety(oracle.clone());

    name_available!(safety, "carol.id", true);
    name_available!(safety, "carol.id", true);
    assert_eq!(oracle.call_count(), 2);

    oracle.register_name("carol.id", NameRecord::new(ALICE, 3000));
    name_available!(safety, "carol.id", false);
    owns_name!(safety, "carol.id", ALICE, true);
    assert_eq!(oracle.call_count(), 4);
}

#[tokio::test]
async fn integration_predicates_direct_calls() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let oracle = sample_registry();
    oracle.register_namespace("app", NamespaceRecord::revealed(ALICE));
    let safety = init_safety(oracle);
    let predicates = safety.predicates();

    assert!(predicates.validator().is_name_valid("alice.id"));
    assert!(predicates.validator().is_namespace_valid("app"));
    assert!(!predicates.is_name_available("alice.id").await.unwrap());
    assert!(predicates.is_namespace_available("eth").await.unwrap());
    assert!(predicates.owns_name("bob.id", BOB).await.unwrap());
    assert!(predicates.revealed_namespace("app", ALICE).await.unwrap());
    assert!(predicates.namespace_is_revealed("app").await.unwrap());
    assert!(!predicates.namespace_is_ready("app").await.unwrap());
    assert!(!predicates.is_in_grace_period("alice.id").await.unwrap());
    assert!(predicates.address_can_receive_name(ALICE).await.unwrap());
}
