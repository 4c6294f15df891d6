//! Masking helpers for logging personal data

/// Mask an email identity for logging, keeping the first two characters of
/// the local part and the full domain (`ab***@email.ntou.edu.tw`).
pub fn mask_identity(identity: &str) -> String {
    match identity.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None if identity.chars().count() <= 4 => "****".to_string(),
        None => {
            let visible: String = identity.chars().take(2).collect();
            format!("{}***", visible)
        }
    }
}
