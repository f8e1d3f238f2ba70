use crate::{AuthState, Identity};

/// **VALUE**: Verifies the unauthenticated state never carries an identity.
///
/// **WHY THIS MATTERS**: UI code shows the display name whenever an identity is
/// present. A disconnected state with a stale name would look logged in.
///
/// **BUG THIS CATCHES**: Would catch a constructor that forgets to clear identity.
#[test]
fn given_unauthenticated_state_when_inspected_then_has_no_identity() {
    let state = AuthState::unauthenticated();

    assert!(!state.is_connected());
    assert!(state.identity().is_none());
    assert_eq!(state, AuthState::default());
}

/// **VALUE**: Verifies missing or blank names fall back to "User".
///
/// **BUG THIS CATCHES**: Would catch an empty display name reaching the header bar.
#[test]
fn given_blank_name_when_building_identity_then_uses_fallback() {
    assert_eq!(Identity::new(None).display_name, "User");
    assert_eq!(Identity::new(Some(String::from("  "))).display_name, "User");
    assert_eq!(Identity::new(Some(String::from("Ana"))).display_name, "Ana");
}

#[test]
fn given_authenticated_state_when_inspected_then_exposes_display_name() {
    let state = AuthState::authenticated(Some(Identity::new(Some(String::from("Ana")))));

    assert!(state.is_connected());
    assert_eq!(state.display_name(), Some("Ana"));
}
