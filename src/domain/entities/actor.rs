//! Authenticated caller identity.

/// The identity an API request acts on behalf of.
///
/// Produced by [`crate::application::services::AuthService`] from a Bearer
/// token and passed explicitly into every operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: true,
        }
    }

    /// Owners and admins may read and mutate a resource.
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_admin || self.id == owner_id
    }
}
