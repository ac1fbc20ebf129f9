use regex::Regex;
use smol_str::SmolStr;

lazy_static::lazy_static! {
    /// Basic `local@domain.tld` shape, anything stricter is left to the mail provider
    pub static ref EMAIL_REGEX: Regex = Regex::new(r#"^[^@\s]+@[^@\s]+\.[^.@\s]+$"#).unwrap();
}

pub const MAX_EMAIL_LEN: usize = 254;

pub fn normalize_email(email: &str) -> SmolStr {
    SmolStr::new(email.trim().to_lowercase())
}

pub fn validate_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}

/// Normalizes every address and keeps only the ones that look deliverable, in input order.
pub fn filter_valid_emails<S: AsRef<str>>(emails: &[S]) -> Vec<SmolStr> {
    emails
        .iter()
        .map(|email| normalize_email(email.as_ref()))
        .filter(|email| validate_email(email))
        .collect()
}
