//! Normalization and grammar checks for identity fields.
//!
//! Usernames and emails are stored trimmed and lowercased; every lookup
//! normalizes the same way so `JDoe` and `jdoe ` name the same account.

/// Username length bounds (after normalization).
const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 50;

/// Email column width.
const EMAIL_MAX_LEN: usize = 100;

/// Trim and lowercase a username.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim and lowercase an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check a normalized username: 3 to 50 characters, no whitespace.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err(format!(
            "Username must be at least {USERNAME_MIN_LEN} characters"
        ));
    }
    if len > USERNAME_MAX_LEN {
        return Err(format!(
            "Username must be at most {USERNAME_MAX_LEN} characters"
        ));
    }
    if username.chars().any(char::is_whitespace) {
        return Err("Username must not contain whitespace".to_string());
    }
    Ok(())
}

/// Check a normalized email against the usual `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(format!("Email must be at most {EMAIL_MAX_LEN} characters"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Email must not contain whitespace".to_string());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Email must contain '@'".to_string());
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err("Email is not a valid address".to_string());
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err("Email domain must contain '.'".to_string());
    };
    if host.is_empty() || tld.is_empty() {
        return Err("Email is not a valid address".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_username("  JDoe "), "jdoe");
        assert_eq!(normalize_email(" JDoe@Example.COM "), "jdoe@example.com");
    }

    #[test]
    fn username_length_bounds() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn username_rejects_whitespace() {
        assert!(validate_username("j doe").is_err());
    }

    #[test]
    fn email_accepts_usual_shapes() {
        assert!(validate_email("jdoe@example.com").is_ok());
        assert!(validate_email("j.doe+tag@mail.example.co").is_ok());
    }

    #[test]
    fn email_rejects_bad_shapes() {
        assert!(validate_email("jdoe").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jdoe@").is_err());
        assert!(validate_email("jdoe@example").is_err());
        assert!(validate_email("jdoe@.com").is_err());
        assert!(validate_email("j doe@example.com").is_err());
        assert!(validate_email("jdoe@exa@mple.com").is_err());
    }
}
