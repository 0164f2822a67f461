use crate::auth::{AuthUser, Role};
use crate::store::Card;

/// Outcome of an access check, kept as a value rather than an error so the
/// decision logic stays independent of HTTP status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// The principal's roles do not cover the card endpoints at all.
    Forbidden,
    /// The record is absent or owned by someone else; the two cases are
    /// deliberately indistinguishable so record existence never leaks.
    NotFound,
}

pub struct OwnershipEnforcer;

impl OwnershipEnforcer {
    /// Role the card endpoints require.
    pub const REQUIRED_ROLE: Role = Role::CardOwner;

    /// Coarse role gate, evaluated before any record lookup.
    pub fn authorize_role(user: &AuthUser) -> AccessDecision {
        if user.has_role(Self::REQUIRED_ROLE) {
            AccessDecision::Allow
        } else {
            AccessDecision::Forbidden
        }
    }

    /// Record-level gate on a lookup result: Allow only when a record was
    /// found and it belongs to the principal.
    pub fn filter_by_ownership(principal: &str, card: Option<&Card>) -> AccessDecision {
        match card {
            Some(card) if card.owner == principal => AccessDecision::Allow,
            _ => AccessDecision::NotFound,
        }
    }
}
