use super::*;
use serde_json::json;

#[test]
fn new_state_is_unauthenticated() {
    let state = SessionState::new();
    assert_eq!(state.status(), AuthStatus::Unauthenticated);
    assert!(state.data().is_none());
    assert!(!state.loading());
    assert!(state.last_refreshed_at().is_none());
}

#[test]
fn status_follows_data_and_loading() {
    let state = SessionState::new();
    state.set_data(Some(json!({ "id": 1 })));
    assert_eq!(state.status(), AuthStatus::Authenticated);

    state.begin_loading();
    assert_eq!(state.status(), AuthStatus::Loading);

    state.finish_loading();
    assert_eq!(state.status(), AuthStatus::Authenticated);
    assert!(state.last_refreshed_at().is_some());

    state.clear_data();
    assert_eq!(state.status(), AuthStatus::Unauthenticated);
}

#[test]
fn null_data_counts_as_absent() {
    let state = SessionState::new();
    state.set_data(Some(serde_json::Value::Null));
    assert!(state.data().is_none());
    assert_eq!(state.status(), AuthStatus::Unauthenticated);
}

#[test]
fn data_is_replaced_wholesale() {
    let state = SessionState::new();
    state.set_data(Some(json!({ "id": 1, "name": "a" })));
    state.set_data(Some(json!({ "id": 2 })));
    assert_eq!(state.data(), Some(json!({ "id": 2 })));
}

#[test]
fn clones_share_one_container() {
    let state = SessionState::new();
    let other = state.clone();
    other.set_data(Some(json!({ "id": 7 })));
    assert_eq!(state.data(), Some(json!({ "id": 7 })));
}

#[tokio::test]
async fn subscribers_see_changes() {
    let state = SessionState::new();
    let mut rx = state.subscribe();

    state.set_data(Some(json!({ "id": 3 })));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status(), AuthStatus::Authenticated);
}
