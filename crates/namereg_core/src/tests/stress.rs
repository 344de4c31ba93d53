use futures::future::join_all;
use tower::ServiceExt;

use crate::{
    oracle::memory::InMemoryOracle,
    safety::{
        api::{NameRecord, NamespaceRecord, SafetyRequest, SafetyResponse},
        init_safety,
    },
};

fn crowded_registry(owners: usize, names_per_owner: usize) -> InMemoryOracle {
    let oracle = InMemoryOracle::with_delay(1);
    oracle.register_namespace("id", NamespaceRecord::ready("addr-ns"));
    for owner in 0..owners {
        for name in 0..names_per_owner {
            oracle.register_name(
                format!("user{owner}-{name}.id"),
                NameRecord::new(format!("addr-{owner}"), (owner * 100) as u64),
            );
        }
    }
    oracle.set_block_height(1000);
    oracle.set_default_grace_period(500);
    oracle
}

#[tokio::test]
async fn stress_concurrent_decisions_are_stable() {
    #[cfg(feature = "namereg_tracing")]
    crate::namereg_tracing::init();
    let owners = 20;
    let oracle = crowded_registry(owners, 30);
    let safety = init_safety(oracle.clone());

    let requests: Vec<SafetyRequest> = (0..owners)
        .flat_map(|owner| {
            [
                SafetyRequest::AddressCanReceiveName(format!("addr-{owner}")),
                SafetyRequest::IsInGracePeriod(format!("user{owner}-0.id")),
                SafetyRequest::OwnsName {
                    name: format!("user{owner}-1.id"),
                    address: format!("addr-{owner}"),
                },
                SafetyRequest::IsNameAvailable(format!("user{owner}-99.id")),
            ]
        })
        .collect();

    let run = || join_all(requests.iter().cloned().map(|request| safety.clone().oneshot(request)));
    let first: Vec<_> = run().await.into_iter().map(Result::unwrap).collect();
    let second: Vec<_> = run().await.into_iter().map(Result::unwrap).collect();
    assert_eq!(first, second);

    for (owner, decisions) in first.chunks(4).enumerate() {
        let expire_block = (owner * 100) as u64;
        let in_grace = 1000 >= expire_block && 1000 < expire_block + 500;
        assert_eq!(
            decisions,
            [
                // 30 names each, above the cap
                SafetyResponse::Decision(false),
                SafetyResponse::Decision(in_grace),
                SafetyResponse::Decision(true),
                SafetyResponse::Decision(true),
            ]
        );
    }
}
