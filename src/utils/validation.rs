use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{Validate, ValidationError, ValidationErrors};

pub fn validate<T: Validate>(val: &T) -> Result<(), ValidationErrors> {
    val.validate()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimit {
    pub min: Option<usize>,
    pub max: usize,
}

pub const COMPANY_LIMIT: FieldLimit = FieldLimit { min: Some(2), max: 100 };
pub const POSITION_LIMIT: FieldLimit = FieldLimit { min: Some(2), max: 100 };
pub const LOCATION_LIMIT: FieldLimit = FieldLimit { min: Some(2), max: 100 };
pub const SOURCE_LIMIT: FieldLimit = FieldLimit { min: None, max: 200 };
pub const NAME_LIMIT: FieldLimit = FieldLimit { min: Some(2), max: 50 };
pub const PASSWORD_LIMIT: FieldLimit = FieldLimit { min: Some(8), max: 100 };

pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:\+|00)33|0)\s*[1-9](?:[\s.-]*\d{2}){4}$").expect("valid phone regex")
    })
}

fn postal_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{5}$").expect("valid postal code regex"))
}

fn otp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{6}$").expect("valid otp regex"))
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn check_length(value: &str, limit: FieldLimit) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if let Some(min) = limit.min {
        if len < min {
            let mut err = error("length", "Valeur trop courte");
            err.add_param(Cow::Borrowed("min"), &min);
            return Err(err);
        }
    }
    if len > limit.max {
        let mut err = error("length", "Valeur trop longue");
        err.add_param(Cow::Borrowed("max"), &limit.max);
        return Err(err);
    }
    Ok(())
}

/// Inclusive bounds check for small integer inputs (score, days).
pub fn check_range(value: u8, min: u8, max: u8) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new("range");
    err.message = Some(Cow::Owned(format!(
        "La valeur doit être comprise entre {} et {}",
        min, max
    )));
    err.add_param(Cow::Borrowed("min"), &min);
    err.add_param(Cow::Borrowed("max"), &max);
    Err(err)
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || phone_regex().is_match(value.trim()) {
        Ok(())
    } else {
        Err(error("invalidPhone", "Numéro de téléphone invalide"))
    }
}

pub fn validate_postal_code(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || postal_code_regex().is_match(value) {
        Ok(())
    } else {
        Err(error("invalidPostalCode", "Code postal invalide"))
    }
}

pub fn validate_otp_code(value: &str) -> Result<(), ValidationError> {
    if otp_regex().is_match(value) {
        Ok(())
    } else {
        Err(error("invalidOtp", "Le code doit contenir 6 chiffres"))
    }
}

/// Accepts absolute http(s) URLs; empty input is accepted.
pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(error("invalidUrl", "URL invalide")),
    }
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    use validator::ValidateEmail;
    if value.trim().is_empty() || value.trim().to_string().validate_email() {
        Ok(())
    } else {
        Err(error("email", "Adresse email invalide"))
    }
}

/// Upper, lower, digit, special character and minimum length. Failed rules
/// are reported as params on the error.
pub fn strong_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let failed: Vec<&'static str> = [
        ("noUpperCase", value.chars().any(|c| c.is_ascii_uppercase())),
        ("noLowerCase", value.chars().any(|c| c.is_ascii_lowercase())),
        ("noNumeric", value.chars().any(|c| c.is_ascii_digit())),
        (
            "noSpecialChar",
            value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)),
        ),
        (
            "tooShort",
            value.chars().count() >= PASSWORD_LIMIT.min.unwrap_or(8),
        ),
    ]
    .into_iter()
    .filter(|(_, ok)| !ok)
    .map(|(rule, _)| rule)
    .collect();

    if failed.is_empty() {
        return Ok(());
    }
    let mut err = error("weakPassword", "Mot de passe trop faible");
    for rule in failed {
        err.add_param(Cow::Borrowed(rule), &true);
    }
    Err(err)
}

pub fn passwords_match(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password == confirm {
        Ok(())
    } else {
        Err(error("passwordMismatch", "Les mots de passe ne correspondent pas"))
    }
}

pub fn emails_match(email: &str, confirm: &str) -> Result<(), ValidationError> {
    if email == confirm {
        Ok(())
    } else {
        Err(error("emailMismatch", "Les adresses email ne correspondent pas"))
    }
}

pub fn future_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date >= today {
        Ok(())
    } else {
        Err(error("pastDate", "La date doit être dans le futur"))
    }
}

pub fn past_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date <= today {
        Ok(())
    } else {
        Err(error("futureDate", "La date ne peut pas être dans le futur"))
    }
}

pub fn date_not_before(earlier: NaiveDate, later: NaiveDate) -> Result<(), ValidationError> {
    if later >= earlier {
        Ok(())
    } else {
        Err(error("dateOrder", "Cette date précède la date de candidature"))
    }
}

pub fn salary_range(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), ValidationError> {
    if min.map(|v| v.is_sign_negative()).unwrap_or(false)
        || max.map(|v| v.is_sign_negative()).unwrap_or(false)
    {
        return Err(error("min", "Le salaire doit être positif"));
    }
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(error(
            "salaryRange",
            "Le salaire minimum dépasse le salaire maximum",
        )),
        _ => Ok(()),
    }
}

/// Flattens field-level errors into `field: message` lines for display.
pub fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();
    lines.sort();
    lines
}
