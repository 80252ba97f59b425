use once_cell::sync::Lazy;
use regex::Regex;

pub const USERNAME_MIN_LEN: usize = 5;
pub const USERNAME_MAX_LEN: usize = 16;
pub const PASSWORD_MIN_LEN: usize = 8;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("Invalid email regex")
});

// 大小写不敏感比较
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "letmein1",
    "welcome1",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len()) {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 按密码策略检查，返回所有未满足的规则
pub fn password_policy_violations(password: &str) -> Vec<&'static str> {
    let rules: [(bool, &'static str); 4] = [
        (
            password.chars().count() >= PASSWORD_MIN_LEN,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
    ];

    let mut violations: Vec<&'static str> = rules
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| msg)
        .collect();

    if COMMON_PASSWORDS
        .iter()
        .any(|common| password.eq_ignore_ascii_case(common))
    {
        violations.push("Password is too common, please choose a stronger password");
    }

    violations
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let violations = password_policy_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("this-name-is-way-too-long").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@uni.edu").is_ok());
        assert!(validate_email("missing-at.edu").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());
        assert_eq!(
            password_policy_violations("short1A"),
            vec!["Password must be at least 8 characters long"]
        );
        assert_eq!(password_policy_violations("alllowercase1").len(), 1);
        assert_eq!(password_policy_violations("NoDigitsHere").len(), 1);
    }

    #[test]
    fn test_common_password_rejected_case_insensitively() {
        let err = validate_password("Password123").unwrap_err();
        assert!(err.contains("too common"));
    }
}
