//! Password policy and hashing via bcrypt.

use tokio::task;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Minimum password length (pre-hash).
const MIN_PASSWORD_LEN: usize = 8;

/// A bcrypt digest ready for storage.
///
/// The only constructors run the complexity policy and then hash, so a
/// digest column can never receive a plaintext or an unchecked value.
/// Every write path (registration, password change, reset confirm) goes
/// through this type.
#[derive(Debug, Clone)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Validate the complexity policy, then hash with bcrypt (cost 10).
    pub fn from_plaintext(candidate: &str) -> Result<Self, AuthError> {
        validate_password(candidate)?;
        let digest = bcrypt::hash(candidate, BCRYPT_COST)
            .map_err(|e| AuthError::Hash(format!("bcrypt hash: {e}")))?;
        Ok(Self(digest))
    }

    /// [`Self::from_plaintext`] on a blocking thread. bcrypt at cost 10
    /// takes tens of milliseconds and must stay off async workers.
    pub async fn from_plaintext_blocking(candidate: String) -> Result<Self, AuthError> {
        task::spawn_blocking(move || Self::from_plaintext(&candidate))
            .await
            .map_err(|e| AuthError::Hash(format!("hash task: {e}")))?
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a candidate password against the complexity policy: at least
/// eight characters, with an uppercase letter, a lowercase letter, a
/// digit and a symbol.
pub fn validate_password(candidate: &str) -> Result<(), AuthError> {
    if candidate.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !candidate.chars().any(|c| c.is_uppercase()) {
        return Err(AuthError::Validation(
            "Password must contain an uppercase letter".into(),
        ));
    }
    if !candidate.chars().any(|c| c.is_lowercase()) {
        return Err(AuthError::Validation(
            "Password must contain a lowercase letter".into(),
        ));
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::Validation(
            "Password must contain a digit".into(),
        ));
    }
    if !candidate.chars().any(|c| !c.is_alphanumeric()) {
        return Err(AuthError::Validation(
            "Password must contain a symbol".into(),
        ));
    }
    Ok(())
}

/// Verify a password against a stored bcrypt digest.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, digest).map_err(|e| AuthError::Hash(format!("bcrypt verify: {e}")))
}

/// [`verify_password`] on a blocking thread.
pub async fn verify_password_blocking(password: String, digest: String) -> Result<bool, AuthError> {
    task::spawn_blocking(move || verify_password(&password, &digest))
        .await
        .map_err(|e| AuthError::Hash(format!("verify task: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_compliant_password() {
        assert!(validate_password("Str0ng!pass").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(matches!(
            validate_password("S0r!t"),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn rejects_missing_uppercase() {
        assert!(validate_password("str0ng!pass").is_err());
    }

    #[test]
    fn rejects_missing_lowercase() {
        assert!(validate_password("STR0NG!PASS").is_err());
    }

    #[test]
    fn rejects_missing_digit() {
        assert!(validate_password("Strong!pass").is_err());
    }

    #[test]
    fn rejects_missing_symbol() {
        assert!(validate_password("Str0ngpass").is_err());
    }

    #[test]
    fn digest_round_trip() {
        let digest = PasswordDigest::from_plaintext("Str0ng!pass").unwrap();
        assert!(verify_password("Str0ng!pass", digest.as_str()).unwrap());
        assert!(!verify_password("Str0ng!pasz", digest.as_str()).unwrap());
    }

    #[test]
    fn weak_password_never_reaches_bcrypt() {
        assert!(matches!(
            PasswordDigest::from_plaintext("weak"),
            Err(AuthError::Validation(_))
        ));
    }
}
