//! Static named patterns used by format validation rules. Compiled once at
//! first use and immutable for the process lifetime.

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pattern {
    ($name:ident, $source:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($source).expect("static pattern"));
    };
}

// Japanese text: hiragana, katakana, kanji, latin, digits, hyphen,
// prolonged sound mark, whitespace
pattern!(JAPANESE_NAME, r"^[\p{Hiragana}\p{Katakana}\p{Han}a-zA-Z0-9\s\-ー]+$");
// Addresses additionally allow full-width digits and both parenthesis styles
pattern!(
    JAPANESE_ADDRESS,
    r"^[\p{Hiragana}\p{Katakana}\p{Han}a-zA-Z0-9\s\-ー０-９（）()]+$"
);
pattern!(KATAKANA, r"^[\p{Katakana}ー\s]+$");
pattern!(HIRAGANA, r"^[\p{Hiragana}\s]+$");

// Simplified RFC-style address check
pattern!(EMAIL, r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$");
// Japanese landline format, hyphen separated
pattern!(PHONE, r"^\d{2,4}-\d{2,4}-\d{4}$");
pattern!(MOBILE_PHONE, r"^0[789]0-\d{4}-\d{4}$");
pattern!(POSTAL_CODE, r"^\d{3}-\d{4}$");

pattern!(ALPHANUMERIC, r"^[a-zA-Z0-9]+$");
pattern!(USERNAME, r"^[a-zA-Z0-9\-_]+$");
pattern!(ALPHA, r"^[a-zA-Z]+$");
pattern!(NUMERIC, r"^\d+$");

pattern!(URL, r"^https?://[\w/:%#$&?()~.=+\-]+$");
pattern!(DOMAIN, r"^[a-zA-Z0-9\-.]+\.[a-zA-Z]{2,}$");

pattern!(CREDIT_CARD, r"^\d{4}-\d{4}-\d{4}-\d{4}$");
pattern!(BANK_ACCOUNT, r"^\d{7}$");

// Letters and digits only, eight or more
pattern!(MEDIUM_PASSWORD, r"^[a-zA-Z\d]{8,}$");

const STRONG_PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Eight or more characters drawn from letters, digits, and the symbol set,
/// with at least one lower, one upper, one digit, and one symbol. The
/// lookahead-free equivalent of the usual strong-password regex.
fn is_strong_password(value: &str) -> bool {
    let allowed = |c: char| {
        c.is_ascii_lowercase()
            || c.is_ascii_uppercase()
            || c.is_ascii_digit()
            || STRONG_PASSWORD_SYMBOLS.contains(c)
    };

    value.chars().count() >= 8
        && value.chars().all(allowed)
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| STRONG_PASSWORD_SYMBOLS.contains(c))
}

/// Every registered pattern name, in listing order.
pub const NAMES: &[&str] = &[
    "japanese_name",
    "japanese_address",
    "katakana",
    "hiragana",
    "email",
    "phone",
    "mobile_phone",
    "postal_code",
    "alphanumeric",
    "username",
    "alpha",
    "numeric",
    "url",
    "domain",
    "credit_card",
    "bank_account",
    "strong_password",
    "medium_password",
];

pub fn exists(name: &str) -> bool {
    NAMES.contains(&name)
}

/// Test `value` against the named pattern. `None` for unknown names.
pub fn matches(name: &str, value: &str) -> Option<bool> {
    let result = match name {
        "japanese_name" => JAPANESE_NAME.is_match(value),
        "japanese_address" => JAPANESE_ADDRESS.is_match(value),
        "katakana" => KATAKANA.is_match(value),
        "hiragana" => HIRAGANA.is_match(value),
        "email" => EMAIL.is_match(value),
        "phone" => PHONE.is_match(value),
        "mobile_phone" => MOBILE_PHONE.is_match(value),
        "postal_code" => POSTAL_CODE.is_match(value),
        "alphanumeric" => ALPHANUMERIC.is_match(value),
        "username" => USERNAME.is_match(value),
        "alpha" => ALPHA.is_match(value),
        "numeric" => NUMERIC.is_match(value),
        "url" => URL.is_match(value),
        "domain" => DOMAIN.is_match(value),
        "credit_card" => CREDIT_CARD.is_match(value),
        "bank_account" => BANK_ACCOUNT.is_match(value),
        "strong_password" => is_strong_password(value),
        "medium_password" => MEDIUM_PASSWORD.is_match(value),
        _ => return None,
    };
    Some(result)
}

/// Pattern descriptions for the CLI listing.
pub fn describe(name: &str) -> Option<&'static str> {
    let description = match name {
        "japanese_name" => "hiragana/katakana/kanji/latin/digits with hyphen and spaces",
        "japanese_address" => "japanese_name plus full-width digits and parentheses",
        "katakana" => "katakana and spaces only",
        "hiragana" => "hiragana and spaces only",
        "email" => "simplified RFC email address",
        "phone" => "landline number, hyphen separated",
        "mobile_phone" => "mobile number (070/080/090)",
        "postal_code" => "japanese postal code (NNN-NNNN)",
        "alphanumeric" => "letters and digits only",
        "username" => "letters, digits, hyphens, underscores",
        "alpha" => "letters only",
        "numeric" => "digits only",
        "url" => "http or https URL",
        "domain" => "domain name with TLD",
        "credit_card" => "card number in NNNN-NNNN-NNNN-NNNN form",
        "bank_account" => "seven-digit account number",
        "strong_password" => "8+ chars with upper, lower, digit, and symbol",
        "medium_password" => "8+ letters and digits",
        _ => return None,
    };
    Some(description)
}
