use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Coarse capability tag gating access to the card endpoints.
///
/// Record-level visibility is decided separately by ownership; this role only
/// answers "may this principal use the card API at all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    CardOwner,
    NonOwner,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card-owner" => Ok(Role::CardOwner),
            "non-owner" => Ok(Role::NonOwner),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Authenticated principal attached to each request after credential verification.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

struct UserRecord {
    password_digest: String,
    roles: Vec<Role>,
}

/// In-process credential store: username -> (SHA-256 password digest, roles).
///
/// Stands in for an external identity provider; the middleware only depends on
/// `verify`, so a different backend can be swapped in behind the same call.
pub struct UserRegistry {
    users: HashMap<String, UserRecord>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    pub fn with_user(mut self, username: &str, password: &str, roles: Vec<Role>) -> Self {
        self.users.insert(
            username.to_string(),
            UserRecord {
                password_digest: digest_password(password),
                roles,
            },
        );
        self
    }

    /// Verify credentials, yielding the principal on success.
    pub fn verify(&self, username: &str, password: &str) -> Option<AuthUser> {
        let record = self.users.get(username)?;
        if record.password_digest != digest_password(password) {
            return None;
        }
        Some(AuthUser {
            username: username.to_string(),
            roles: record.roles.clone(),
        })
    }

    /// Build the registry from the CARD_USERS env var
    /// (`name:password:role` triples, comma-separated), falling back to the
    /// built-in development users when unset.
    pub fn from_env() -> Self {
        match std::env::var("CARD_USERS") {
            Ok(spec) if !spec.is_empty() => match Self::parse_spec(&spec) {
                Ok(registry) => registry,
                Err(e) => {
                    tracing::warn!("Invalid CARD_USERS, using development users: {}", e);
                    Self::development_users()
                }
            },
            _ => Self::development_users(),
        }
    }

    fn parse_spec(spec: &str) -> Result<Self, String> {
        let mut registry = Self::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let mut parts = entry.splitn(3, ':');
            let (name, password, role) = match (parts.next(), parts.next(), parts.next()) {
                (Some(n), Some(p), Some(r)) => (n, p, r),
                _ => return Err(format!("expected name:password:role, got '{}'", entry)),
            };
            registry = registry.with_user(name, password, vec![role.parse()?]);
        }
        Ok(registry)
    }

    fn development_users() -> Self {
        Self::new()
            .with_user("sarah1", "abc123", vec![Role::CardOwner])
            .with_user("kumar2", "xyz789", vec![Role::CardOwner])
            .with_user("hank-owns-no-cards", "qrs456", vec![Role::NonOwner])
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_correct_credentials() {
        let registry = UserRegistry::new().with_user("sarah1", "abc123", vec![Role::CardOwner]);
        let user = registry.verify("sarah1", "abc123").expect("should verify");
        assert_eq!(user.username, "sarah1");
        assert!(user.has_role(Role::CardOwner));
    }

    #[test]
    fn verify_rejects_wrong_password_and_unknown_user() {
        let registry = UserRegistry::new().with_user("sarah1", "abc123", vec![Role::CardOwner]);
        assert!(registry.verify("sarah1", "BAD-PASSWORD").is_none());
        assert!(registry.verify("BAD-USER", "abc123").is_none());
    }

    #[test]
    fn parse_spec_builds_users_with_roles() {
        let registry =
            UserRegistry::parse_spec("alice:pw1:card-owner, bob:pw2:non-owner").unwrap();
        assert!(registry.verify("alice", "pw1").unwrap().has_role(Role::CardOwner));
        assert!(registry.verify("bob", "pw2").unwrap().has_role(Role::NonOwner));
    }

    #[test]
    fn parse_spec_rejects_malformed_entries() {
        assert!(UserRegistry::parse_spec("alice:pw1").is_err());
        assert!(UserRegistry::parse_spec("alice:pw1:superuser").is_err());
    }
}
