//! Authentication credentials
//!
//! This module provides authentication credential types and constructors
//! for the asset status client.

/// Authentication credentials for the asset service
///
/// Supports bearer tokens (the service's standard scheme) as well as API
/// keys and unauthenticated access for development setups.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Bearer token authentication
    BearerToken(String),
    /// API key authentication
    ApiKey(String),
    /// No authentication (for testing/development)
    None,
}

impl Credentials {
    /// Create bearer token credentials
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(token.into())
    }

    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create credentials with no authentication
    pub fn none() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials() {
        let bearer = Credentials::bearer_token("test-token");
        let api_key = Credentials::api_key("test-key");
        let none = Credentials::none();

        match bearer {
            Credentials::BearerToken(token) => assert_eq!(token, "test-token"),
            _ => panic!("Expected bearer token credentials"),
        }

        match api_key {
            Credentials::ApiKey(key) => assert_eq!(key, "test-key"),
            _ => panic!("Expected API key credentials"),
        }

        match none {
            Credentials::None => {}
            _ => panic!("Expected no credentials"),
        }
    }
}
