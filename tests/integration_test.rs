/// Integration tests for the application layer
mod test_utilities;

use riskwatch::application::dto::{
    AddDeviceRequest, BreachPolicyRequest, CreateCompanyRequest, CreateUserRequest,
    ManualBreachRequest, ReportBreachRequest, ResolveBreachRequest, UpdateUserRequest,
};
use riskwatch::prelude::*;
use std::net::IpAddr;
use std::sync::Arc;
use test_utilities::mocks::*;

fn wire(provider: Arc<MockIpReputationProvider>) -> AppState {
    AppState::new(
        Arc::new(InMemoryStore::new()),
        provider,
        UserRiskWeights::default(),
        DeviceRiskPolicy::default(),
        "in-memory",
    )
}

fn state() -> AppState {
    wire(Arc::new(MockIpReputationProvider::new()))
}

fn ip(text: &str) -> IpAddr {
    text.parse().unwrap()
}

fn risk_error(err: &anyhow::Error) -> &RiskError {
    err.downcast_ref::<RiskError>()
        .expect("expected a RiskError")
}

async fn register(state: &AppState, passport: &str) -> User {
    let (user, _) = state
        .users
        .register(
            CreateUserRequest {
                name: "Test User".to_string(),
                passport_string: passport.to_string(),
                ip_address: None,
            },
            None,
        )
        .await
        .unwrap();
    user
}

fn report(user_id: &str, effect_score: i64, company_id: Option<&str>) -> ReportBreachRequest {
    ReportBreachRequest {
        user_id: user_id.to_string(),
        breach_type: "fraud".to_string(),
        effect_score,
        description: "chargeback".to_string(),
        company_id: company_id.map(str::to_string),
    }
}

async fn ref_score(state: &AppState, passport: &str) -> u8 {
    state.users.score(passport).await.unwrap().ref_score.value()
}

#[tokio::test]
async fn test_register_is_idempotent() {
    let state = state();

    let (first, created) = state
        .users
        .register(
            CreateUserRequest {
                name: "Alice".to_string(),
                passport_string: "P1234567".to_string(),
                ip_address: None,
            },
            None,
        )
        .await
        .unwrap();
    assert!(created);
    assert_eq!(first.ref_score, Score::MIN);

    let (second, created) = state
        .users
        .register(
            CreateUserRequest {
                name: "Someone Else".to_string(),
                passport_string: "P1234567".to_string(),
                ip_address: None,
            },
            None,
        )
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(second.name.as_str(), "Alice");
    assert_eq!(state.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_and_delete_user() {
    let state = state();
    register(&state, "P1234567").await;

    let renamed = state
        .users
        .rename(
            "P1234567",
            UpdateUserRequest {
                name: "Renamed".to_string(),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(renamed.name.as_str(), "Renamed");

    state.users.delete("P1234567").await.unwrap();
    let err = state.users.get("P1234567", None).await.unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));

    let err = state.users.delete("P1234567").await.unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));
}

#[tokio::test]
async fn test_report_and_resolve_moves_ref_score() {
    let state = state();
    register(&state, "P1234567").await;

    let event = state
        .breach_events
        .report(report("P1234567", 75, Some("acme")))
        .await
        .unwrap();
    assert_eq!(event.severity, Severity::High);
    assert!(event.is_open());
    assert!(!event.manual_entry);
    assert_eq!(ref_score(&state, "P1234567").await, 22);

    let unresolved = state.breach_events.unresolved().await.unwrap();
    assert_eq!(unresolved.len(), 1);

    let resolved = state
        .breach_events
        .resolve(
            &event.id.to_string(),
            ResolveBreachRequest {
                resolution_notes: Some("refunded".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, BreachStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
    assert_eq!(resolved.resolution_notes.as_deref(), Some("refunded"));

    assert!(state.breach_events.unresolved().await.unwrap().is_empty());
    assert_eq!(ref_score(&state, "P1234567").await, 0);
}

#[tokio::test]
async fn test_resolve_twice_is_conflict() {
    let state = state();
    register(&state, "P1234567").await;
    let event = state
        .breach_events
        .report(report("P1234567", 30, None))
        .await
        .unwrap();
    let id = event.id.to_string();

    state
        .breach_events
        .resolve(&id, ResolveBreachRequest::default())
        .await
        .unwrap();
    let err = state
        .breach_events
        .resolve(&id, ResolveBreachRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::Conflict { .. }));

    let stored = state.breach_events.get(&id).await.unwrap();
    assert_eq!(stored.status, BreachStatus::Resolved);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_have_one_winner() {
    let state = state();
    register(&state, "P1234567").await;
    let event = state
        .breach_events
        .report(report("P1234567", 75, Some("acme")))
        .await
        .unwrap();
    let id = event.id.to_string();

    let tasks: Vec<_> = ["first", "second"]
        .into_iter()
        .map(|notes| {
            let events = state.breach_events.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let request = ResolveBreachRequest {
                    resolution_notes: Some(notes.to_string()),
                };
                (notes, events.resolve(&id, request).await)
            })
        })
        .collect();

    let mut winners = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            (notes, Ok(_)) => winners.push(notes),
            (_, Err(err)) => assert!(matches!(risk_error(&err), RiskError::Conflict { .. })),
        }
    }
    assert_eq!(winners.len(), 1);

    let stored = state.breach_events.get(&id).await.unwrap();
    assert_eq!(stored.resolution_notes.as_deref(), Some(winners[0]));
    assert_eq!(ref_score(&state, "P1234567").await, 0);
}

#[tokio::test]
async fn test_reregistered_user_keeps_open_breach_score() {
    let state = state();
    register(&state, "abc123").await;
    state
        .breach_events
        .report(report("abc123", 75, Some("acme")))
        .await
        .unwrap();
    assert_eq!(ref_score(&state, "abc123").await, 22);

    state.users.delete("abc123").await.unwrap();
    let user = register(&state, "abc123").await;

    assert_eq!(user.ref_score.value(), 22);
    assert_eq!(ref_score(&state, "abc123").await, 22);
    assert_eq!(state.breach_events.by_user("abc123").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_keeps_ref_score() {
    let state = state();
    register(&state, "P1234567").await;
    state
        .breach_events
        .report(report("P1234567", 75, Some("acme")))
        .await
        .unwrap();

    let renamed = state
        .users
        .rename(
            "P1234567",
            UpdateUserRequest {
                name: "Renamed".to_string(),
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(renamed.name.as_str(), "Renamed");
    assert_eq!(renamed.ref_score.value(), 22);
}

#[tokio::test]
async fn test_report_rejects_bad_input() {
    let state = state();
    register(&state, "P1234567").await;

    let err = state
        .breach_events
        .report(report("P1234567", 101, None))
        .await
        .unwrap_err();
    assert!(matches!(
        risk_error(&err),
        RiskError::Validation { field, .. } if field == "effect_score"
    ));

    let mut bad_type = report("P1234567", 50, None);
    bad_type.breach_type = "JAYWALKING".to_string();
    let err = state.breach_events.report(bad_type).await.unwrap_err();
    assert!(matches!(
        risk_error(&err),
        RiskError::Validation { field, .. } if field == "breach_type"
    ));

    let err = state
        .breach_events
        .report(report("NOBODY-999", 50, None))
        .await
        .unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));

    assert!(state.breach_events.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_manual_entry_keeps_explicit_severity_and_status() {
    let state = state();
    register(&state, "P1234567").await;

    let event = state
        .breach_events
        .report_manual(ManualBreachRequest {
            report: report("P1234567", 10, None),
            severity: Some("critical".to_string()),
            status: Some("RESOLVED".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(event.severity, Severity::Critical);
    assert_eq!(event.status, BreachStatus::Resolved);
    assert!(event.manual_entry);

    // Resolved entries do not count towards the score.
    assert!(state.breach_events.unresolved().await.unwrap().is_empty());
    assert_eq!(ref_score(&state, "P1234567").await, 0);
}

#[tokio::test]
async fn test_delete_event_lowers_score() {
    let state = state();
    register(&state, "P1234567").await;
    let event = state
        .breach_events
        .report(report("P1234567", 90, Some("acme")))
        .await
        .unwrap();
    assert!(ref_score(&state, "P1234567").await > 0);

    state
        .breach_events
        .delete(&event.id.to_string())
        .await
        .unwrap();
    assert_eq!(ref_score(&state, "P1234567").await, 0);

    let err = state
        .breach_events
        .get(&event.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));
}

#[tokio::test]
async fn test_events_filtered_by_user_and_company() {
    let state = state();
    register(&state, "P1111111").await;
    register(&state, "P2222222").await;

    state
        .breach_events
        .report(report("P1111111", 20, Some("acme")))
        .await
        .unwrap();
    state
        .breach_events
        .report(report("P2222222", 20, Some("globex")))
        .await
        .unwrap();
    state
        .breach_events
        .report(report("P2222222", 20, Some("acme")))
        .await
        .unwrap();

    assert_eq!(state.breach_events.by_user("P2222222").await.unwrap().len(), 2);
    assert_eq!(state.breach_events.by_company("acme").await.unwrap().len(), 2);
    assert_eq!(state.breach_events.by_company("initech").await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_company_policy_lifecycle() {
    let state = state();

    let (company, created) = state
        .companies
        .create(CreateCompanyRequest {
            id: Some("acme".to_string()),
            name: "Acme Corp".to_string(),
            industry: "Retail".to_string(),
        })
        .await
        .unwrap();
    assert!(created);
    assert!(company.breach.is_none());

    let (policy, created) = state
        .companies
        .create_policy(
            "acme",
            BreachPolicyRequest {
                breach_type: "DATA_LEAK".to_string(),
                effect_score: 85,
                description: Some("customer data exposed".to_string()),
            },
        )
        .await
        .unwrap();
    assert!(created);
    assert_eq!(policy.breach_type, BreachType::DataLeak);

    // A second create leaves the first policy in place.
    let (again, created) = state
        .companies
        .create_policy(
            "acme",
            BreachPolicyRequest {
                breach_type: "FRAUD".to_string(),
                effect_score: 10,
                description: None,
            },
        )
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(again.breach_type, BreachType::DataLeak);

    let view = state.companies.get("acme").await.unwrap();
    assert_eq!(view.breach.unwrap().effect_score.value(), 85);

    assert_eq!(state.companies.high_impact("80").await.unwrap().len(), 1);
    assert_eq!(state.companies.high_impact("90").await.unwrap().len(), 0);
    assert_eq!(
        state
            .companies
            .companies_with_breach_type("data leak")
            .await
            .unwrap(),
        vec!["acme".to_string()]
    );

    let updated = state
        .companies
        .update_policy(
            "acme",
            BreachPolicyRequest {
                breach_type: "FRAUD".to_string(),
                effect_score: 40,
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.breach_type, BreachType::Fraud);

    state.companies.delete_policy("acme").await.unwrap();
    let err = state.companies.policy("acme").await.unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));
}

#[tokio::test]
async fn test_policy_requires_company() {
    let state = state();
    let err = state
        .companies
        .create_policy(
            "ghost",
            BreachPolicyRequest {
                breach_type: "FRAUD".to_string(),
                effect_score: 50,
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::NotFound { .. }));

    let err = state.companies.high_impact("abc").await.unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::Validation { .. }));
}

#[tokio::test]
async fn test_register_with_client_ip_records_device() {
    let provider = Arc::new(MockIpReputationProvider::new());
    let state = wire(provider.clone());

    let (user, _) = state
        .users
        .register(
            CreateUserRequest {
                name: "Alice".to_string(),
                passport_string: "P1234567".to_string(),
                ip_address: Some("10.0.0.1".to_string()),
            },
            Some(ip("203.0.113.7")),
        )
        .await
        .unwrap();

    let devices = state.devices.devices_of("P1234567").await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].ip_address, ip("203.0.113.7"));
    assert_eq!(provider.call_count(), 1);
    // One device alone nudges the reference score off zero.
    assert_eq!(user.ref_score.value(), 1);

    // Seeing the same address again refreshes rather than duplicates.
    state
        .users
        .get("P1234567", Some(ip("203.0.113.7")))
        .await
        .unwrap();
    assert_eq!(state.devices.devices_of("P1234567").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_device_risk_and_suspicious_devices() {
    let provider = Arc::new(MockIpReputationProvider::new().with_vpn("198.51.100.9", 40));
    let state = wire(provider);
    register(&state, "P1234567").await;

    state
        .devices
        .add_device(AddDeviceRequest {
            user_id: "P1234567".to_string(),
            ip_address: "198.51.100.9".to_string(),
        })
        .await
        .unwrap();
    state
        .devices
        .add_device(AddDeviceRequest {
            user_id: "P1234567".to_string(),
            ip_address: "192.0.2.1".to_string(),
        })
        .await
        .unwrap();

    let risk = state.devices.risk_score("P1234567").await.unwrap();
    assert_eq!(risk.risk_score.value(), 50);

    let suspicious = state.devices.suspicious().await.unwrap();
    assert_eq!(suspicious.len(), 1);
    assert_eq!(suspicious[0].ip_address, ip("198.51.100.9"));

    let detail = state.users.risk("P1234567", None).await.unwrap();
    assert_eq!(detail.risk_score.value(), 50);
    assert_eq!(detail.devices.len(), 2);
}

#[tokio::test]
async fn test_shared_devices_and_cascade_delete() {
    let state = state();
    register(&state, "P1111111").await;
    register(&state, "P2222222").await;

    for user in ["P1111111", "P2222222"] {
        state
            .devices
            .add_device(AddDeviceRequest {
                user_id: user.to_string(),
                ip_address: "203.0.113.50".to_string(),
            })
            .await
            .unwrap();
    }
    state
        .devices
        .add_device(AddDeviceRequest {
            user_id: "P1111111".to_string(),
            ip_address: "203.0.113.51".to_string(),
        })
        .await
        .unwrap();

    let shared = state.devices.shared().await.unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].ip_address, ip("203.0.113.50"));
    assert_eq!(shared[0].user_ids.len(), 2);

    state
        .breach_events
        .report(report("P1111111", 50, None))
        .await
        .unwrap();
    state.users.delete("P1111111").await.unwrap();

    assert!(state.devices.devices_of("P1111111").await.unwrap().is_empty());
    assert!(state.devices.shared().await.unwrap().is_empty());
    assert_eq!(state.breach_events.by_user("P1111111").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lookup_failure_records_unknown_device() {
    let provider = Arc::new(MockIpReputationProvider::with_failure());
    let state = wire(provider.clone());
    register(&state, "P1234567").await;

    let device = state
        .devices
        .add_device(AddDeviceRequest {
            user_id: "P1234567".to_string(),
            ip_address: "203.0.113.7".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(device.reputation, IpReputation::unknown());

    let refreshed = state.devices.refresh_devices_of("P1234567").await.unwrap();
    assert_eq!(refreshed.len(), 1);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_add_device_rejects_invalid_ip() {
    let state = state();
    let err = state
        .devices
        .add_device(AddDeviceRequest {
            user_id: "P1234567".to_string(),
            ip_address: "999.1.1.1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(risk_error(&err), RiskError::Validation { .. }));
}

#[tokio::test]
async fn test_snapshot_round_trip_through_store() {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(OfflineIpReputationProvider),
        UserRiskWeights::default(),
        DeviceRiskPolicy::default(),
        "in-memory",
    );
    register(&state, "P1234567").await;
    state
        .breach_events
        .report(report("P1234567", 75, Some("acme")))
        .await
        .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let snapshots = SnapshotStore::new(dir.path().join("riskwatch.json"));
    snapshots.save(&store.snapshot()).unwrap();

    let restored = snapshots.load().unwrap().unwrap();
    let state = AppState::new(
        Arc::new(InMemoryStore::from_snapshot(restored)),
        Arc::new(OfflineIpReputationProvider),
        UserRiskWeights::default(),
        DeviceRiskPolicy::default(),
        "in-memory",
    );
    assert_eq!(ref_score(&state, "P1234567").await, 22);
    assert_eq!(state.breach_events.unresolved().await.unwrap().len(), 1);
}
