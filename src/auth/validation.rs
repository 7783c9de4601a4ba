//! Shape checks applied to credentials before they reach the store.

pub const MIN_EMAIL_LEN: usize = 5;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed, lowercased form used as the table key.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Contains `@` and is at least five characters long. Nothing more.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.chars().count() >= MIN_EMAIL_LEN
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
