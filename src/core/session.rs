//! Session Context and Role-Based Navigation
//!
//! The signed-in user is carried in an explicit [`SessionContext`] handed to
//! the components that need it, never in process-global state. Navigation is
//! derived from the role by a pure function so every role's menu is
//! enumerable and testable without a UI.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

// ============================================================================
// Roles
// ============================================================================

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Operations,
    Driver,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operations => "operations",
            Role::Driver => "driver",
            Role::Customer => "customer",
        }
    }

    /// Whether this role may open the booking wizard.
    pub fn can_create_bookings(&self) -> bool {
        matches!(self, Role::Admin | Role::Operations | Role::Customer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Navigation destinations, independent of any rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    Dashboard,
    Bookings,
    Drivers,
    Invoices,
    Users,
    MyJobs,
    Settings,
}

/// Menu entries visible to the given role, in display order.
pub fn items_for(role: Role) -> Vec<MenuItem> {
    match role {
        Role::Admin => vec![
            MenuItem::Dashboard,
            MenuItem::Bookings,
            MenuItem::Drivers,
            MenuItem::Invoices,
            MenuItem::Users,
            MenuItem::Settings,
        ],
        Role::Operations => vec![
            MenuItem::Dashboard,
            MenuItem::Bookings,
            MenuItem::Drivers,
            MenuItem::Invoices,
            MenuItem::Settings,
        ],
        Role::Driver => vec![MenuItem::Dashboard, MenuItem::MyJobs, MenuItem::Settings],
        Role::Customer => vec![
            MenuItem::Dashboard,
            MenuItem::Bookings,
            MenuItem::Invoices,
            MenuItem::Settings,
        ],
    }
}

// ============================================================================
// Session Context
// ============================================================================

/// The signed-in user, as the rest of the app sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub role: Role,
}

/// Shared, observable sign-in state.
///
/// Cloning is cheap; all clones observe the same session. Components that
/// need to react to sign-in changes hold a [`watch::Receiver`] from
/// [`subscribe`](Self::subscribe).
#[derive(Debug, Clone)]
pub struct SessionContext {
    sender: watch::Sender<Option<SessionUser>>,
}

impl SessionContext {
    /// Create a signed-out session.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn sign_in(&self, user: SessionUser) {
        tracing::info!(user_id = %user.user_id, role = %user.role, "User signed in");
        self.sender.send_replace(Some(user));
    }

    pub fn sign_out(&self) {
        tracing::info!("User signed out");
        self.sender.send_replace(None);
    }

    /// Snapshot of the current user, if signed in.
    pub fn current(&self) -> Option<SessionUser> {
        self.sender.borrow().clone()
    }

    /// Subscribe to sign-in changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.sender.subscribe()
    }

    /// Menu for the current user; empty when signed out.
    pub fn menu(&self) -> Vec<MenuItem> {
        self.current()
            .map(|user| items_for(user.role))
            .unwrap_or_default()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, 6)]
    #[case(Role::Operations, 5)]
    #[case(Role::Driver, 3)]
    #[case(Role::Customer, 4)]
    fn test_menu_sizes(#[case] role: Role, #[case] expected: usize) {
        assert_eq!(items_for(role).len(), expected);
    }

    #[test]
    fn test_only_admin_sees_users() {
        for role in [Role::Admin, Role::Operations, Role::Driver, Role::Customer] {
            let has_users = items_for(role).contains(&MenuItem::Users);
            assert_eq!(has_users, role == Role::Admin);
        }
    }

    #[test]
    fn test_driver_cannot_create_bookings() {
        assert!(!Role::Driver.can_create_bookings());
        assert!(Role::Operations.can_create_bookings());
        assert!(!items_for(Role::Driver).contains(&MenuItem::Bookings));
    }

    #[test]
    fn test_session_starts_signed_out() {
        let session = SessionContext::new();
        assert!(session.current().is_none());
        assert!(session.menu().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionContext::new();
        let view = session.clone();

        session.sign_in(SessionUser {
            user_id: "u-1".to_string(),
            role: Role::Operations,
        });
        assert_eq!(view.current().map(|u| u.role), Some(Role::Operations));

        session.sign_out();
        assert!(view.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_sign_in() {
        let session = SessionContext::new();
        let mut rx = session.subscribe();

        session.sign_in(SessionUser {
            user_id: "u-2".to_string(),
            role: Role::Driver,
        });

        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().map(|u| u.user_id.clone()),
            Some("u-2".to_string())
        );
    }
}
