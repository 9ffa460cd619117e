use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+]?[1-9]\d{0,15}$").expect("Invalid phone regex"));

pub static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]+$").expect("Invalid course code regex"));

pub static LOWERCASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]").expect("Invalid lowercase regex"));

pub static UPPERCASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]").expect("Invalid uppercase regex"));

pub static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("Invalid digit regex"));

pub const PASSWORD_MIN_LENGTH: usize = 6;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email");
    }
    Ok(())
}

/// 是否同时包含小写字母、大写字母和数字
pub fn has_password_classes(password: &str) -> bool {
    LOWERCASE_RE.is_match(password)
        && UPPERCASE_RE.is_match(password)
        && DIGIT_RE.is_match(password)
}
