use lazy_static::lazy_static;
use regex::Regex;

/// Characters accepted as "special" in passwords.
pub const SPECIAL_CHARACTERS: &str = "~!@#$%^&*()-_+=<>?/[]{}|";

fn has_country_prefix(phone_number: &str) -> bool {
    lazy_static! {
        static ref PREFIX_RE: Regex = Regex::new(r"^\+62").unwrap();
    }
    PREFIX_RE.is_match(phone_number)
}

/// Checks a phone number: 10-13 characters and the Indonesian `+62` prefix.
/// Both checks run independently; an empty result means the value passed.
pub fn validate_phone_number(phone_number: &str) -> Vec<String> {
    let mut messages = Vec::new();

    if phone_number.len() < 10 || phone_number.len() > 13 {
        messages.push("Phone number must be between 10 and 13 characters".to_string());
    }

    if !has_country_prefix(phone_number) {
        messages.push("Invalid phone number".to_string());
    }

    messages
}

/// Checks a full name: 3-60 characters.
pub fn validate_full_name(full_name: &str) -> Vec<String> {
    let mut messages = Vec::new();

    if full_name.len() < 3 || full_name.len() > 60 {
        messages.push("Full name must be between 3 and 60 characters".to_string());
    }

    messages
}

/// Checks a plaintext password: 6-64 characters, at least one uppercase
/// letter, one digit and one special character. All four checks run
/// independently and every failure is reported.
pub fn validate_password(password: &str) -> Vec<String> {
    let mut messages = Vec::new();

    if password.len() < 6 || password.len() > 64 {
        messages.push("Password must be between 6 and 64 characters".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        messages.push("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        messages.push("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        messages.push("Password must contain at least one special character".to_string());
    }

    messages
}

/// Runs all three field checks without short-circuiting and returns the
/// union of their messages. The texts are identical to the standalone
/// checks so callers can present either itemized or combined feedback.
pub fn validate_registration(full_name: &str, phone_number: &str, password: &str) -> Vec<String> {
    let mut messages = validate_phone_number(phone_number);
    messages.extend(validate_full_name(full_name));
    messages.extend(validate_password(password));
    messages
}
