//! Identity and password policy checks

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::VerificationError;

use super::config::VerificationConfig;

static LOCAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+$").expect("local part pattern is valid"));

/// Checks that `identity` is an address at the configured domain (case-insensitive)
pub fn validate_identity(config: &VerificationConfig, identity: &str) -> Result<(), VerificationError> {
    let invalid = || VerificationError::InvalidFormat {
        identity: identity.to_string(),
    };

    let (local, domain) = identity.trim().rsplit_once('@').ok_or_else(invalid)?;
    if !LOCAL_PART.is_match(local) || !domain.eq_ignore_ascii_case(&config.email_domain) {
        return Err(invalid());
    }
    Ok(())
}

/// Checks length bounds and the lowercase/uppercase/digit mix
pub fn validate_secret_strength(config: &VerificationConfig, secret: &str) -> Result<(), VerificationError> {
    let len = secret.chars().count();
    let strong = len >= config.secret_min_len
        && len <= config.secret_max_len
        && secret.chars().any(|c| c.is_ascii_lowercase())
        && secret.chars().any(|c| c.is_ascii_uppercase())
        && secret.chars().any(|c| c.is_ascii_digit());

    if strong {
        Ok(())
    } else {
        Err(VerificationError::WeakSecret {
            min: config.secret_min_len,
            max: config.secret_max_len,
        })
    }
}
