use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
}

/// An authenticated caller: who they are and what they may do.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to the identity it was issued for, or None
    /// when the token is unknown.
    fn resolve(&self, token: &str) -> Option<Identity>;
}

/// Token table loaded from configuration: comma-separated `token:subject`
/// pairs, each resolving to an admin identity. A pair without a subject
/// gets "admin".
pub struct StaticTokenProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenProvider {
    pub fn from_spec(spec: &str) -> Self {
        let mut tokens = HashMap::new();
        for pair in spec.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (token, subject) = pair.split_once(':').unwrap_or((pair, "admin"));
            if token.is_empty() {
                continue;
            }
            tokens.insert(
                token.to_string(),
                Identity {
                    subject: subject.to_string(),
                    roles: vec![Role::Admin],
                },
            );
        }
        Self { tokens }
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).cloned()
    }
}

/// Check the Authorization header against the provider and require `role`.
/// Unknown or missing tokens are 401; a known identity without the role
/// is 403.
pub fn authorize(
    headers: &HeaderMap,
    provider: &dyn IdentityProvider,
    role: Role,
) -> Result<Identity, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    let identity = provider.resolve(token).ok_or(AppError::Unauthorized)?;

    if !identity.has_role(role) {
        return Err(AppError::Forbidden);
    }
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RolelessProvider;

    impl IdentityProvider for RolelessProvider {
        fn resolve(&self, token: &str) -> Option<Identity> {
            (token == "viewer-token").then(|| Identity {
                subject: "viewer".to_string(),
                roles: vec![],
            })
        }
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[test]
    fn test_from_spec_parses_pairs() {
        let provider = StaticTokenProvider::from_spec("alpha:asha, beta:rohan");
        assert_eq!(provider.resolve("alpha").unwrap().subject, "asha");
        assert_eq!(provider.resolve("beta").unwrap().subject, "rohan");
        assert!(provider.resolve("gamma").is_none());
    }

    #[test]
    fn test_from_spec_defaults_subject() {
        let provider = StaticTokenProvider::from_spec("solo-token");
        let identity = provider.resolve("solo-token").unwrap();
        assert_eq!(identity.subject, "admin");
        assert!(identity.has_role(Role::Admin));
    }

    #[test]
    fn test_from_spec_skips_empty_entries() {
        let provider = StaticTokenProvider::from_spec(",alpha:asha,,:ghost,");
        assert!(provider.resolve("alpha").is_some());
        assert!(provider.resolve("").is_none());
    }

    #[test]
    fn test_authorize_accepts_admin() {
        let provider = StaticTokenProvider::from_spec("alpha:asha");
        let identity = authorize(&bearer_headers("alpha"), &provider, Role::Admin).unwrap();
        assert_eq!(identity.subject, "asha");
    }

    #[test]
    fn test_authorize_rejects_unknown_token() {
        let provider = StaticTokenProvider::from_spec("alpha:asha");
        let err = authorize(&bearer_headers("wrong"), &provider, Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_authorize_rejects_missing_header() {
        let provider = StaticTokenProvider::from_spec("alpha:asha");
        let err = authorize(&HeaderMap::new(), &provider, Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_authorize_rejects_missing_role() {
        let err = authorize(
            &bearer_headers("viewer-token"),
            &RolelessProvider,
            Role::Admin,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
