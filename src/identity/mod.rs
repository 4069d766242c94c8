//! Optional signed-in identity.
//!
//! A deployment may authenticate its users, but the slip flow never requires it: the controller
//! only records who was signed in when a slip went out.

/// The account a slip was filed under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Stable account id.
    pub uid: String,
    /// Human-readable name, when the provider has one.
    pub display_name: Option<String>,
    /// Account email, when known.
    pub email: Option<String>,
}

/// Source of the signed-in user.
pub trait IdentityProvider {
    /// The currently signed-in user, if any.
    fn current_identity(&self) -> Option<Identity>;
}

/// A provider that always reports the same identity (or none).
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity(pub Option<Identity>);

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.0.clone()
    }
}

impl Identity {
    /// Short label for logs: display name, else email, else uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/identity/mod.rs"]
mod tests;
