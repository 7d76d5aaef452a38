//! Field rules shared by the form drafts.
//!
//! Each rule carries the alert text shown when it fails.

use std::borrow::Cow;
use validator::ValidationError;

fn failed(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// `local@domain.tld`: no whitespace, exactly one `@`, non-empty local part,
/// and a dot inside the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn email_address(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(failed("required", "Email is required"));
    }
    if !is_valid_email(email) {
        return Err(failed("email", "Please enter a valid email"));
    }
    Ok(())
}

pub fn password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failed("required", "Password is required"));
    }
    if password.chars().count() < 6 {
        return Err(failed("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

pub fn contact_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failed("required", "Name and phone number are required!"));
    }
    Ok(())
}

pub fn link_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failed("required", "Please fill in all fields"));
    }
    Ok(())
}

pub fn description_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failed("required", "Please enter activity description"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in ["a@b.co", "jane.doe@mail.example.com", "x+tag@d.io"] {
            assert!(is_valid_email(email), "{email} should be valid");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "bad-email",
            "@domain.com",
            "user@",
            "user@domain",
            "user@.com",
            "user@domain.",
            "user@@domain.com",
            "us er@domain.com",
            "a@b@c.com",
        ] {
            assert!(!is_valid_email(email), "{email:?} should be invalid");
        }
    }

    #[test]
    fn test_email_rule_messages() {
        assert_eq!(
            email_address("").unwrap_err().message.as_deref(),
            Some("Email is required")
        );
        assert_eq!(
            email_address("bad-email").unwrap_err().message.as_deref(),
            Some("Please enter a valid email")
        );
        assert!(email_address("ok@example.com").is_ok());
    }

    #[test]
    fn test_required_rules_trim() {
        assert!(contact_required("   ").is_err());
        assert!(contact_required(" Jane ").is_ok());
        assert!(link_required("").is_err());
        assert!(description_required("\t").is_err());
    }
}
