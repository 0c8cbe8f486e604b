//! Bearer tokens issued by the identity service.

use std::fmt;

use zeroize::Zeroizing;

/// Bearer token attached to every backend call made on behalf of a user.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_the_token() {
        let token = AccessToken::new("eyJhbGciOi.secret.sig");

        assert!(!format!("{token:?}").contains("secret"));
        assert_eq!(token.expose(), "eyJhbGciOi.secret.sig");
    }
}
