//! Input patterns for account and profile forms.
//!
//! Host applications use these to pre-validate user input before a request is
//! built; the identity builders use the document patterns directly.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
});

pub static NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"^[a-zA-Z ]+$"));

pub static PASSWORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"^[a-zA-Z0-9!@#$%^\&*(),.?":{}|<>]{8,50}$"#));

pub static CONTACT: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]+$"));

pub static DECIMAL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[1-9][0-9]*(\.[0-9]+)?"));

/// `YYYY-MM-DD` with a plausible month and day.
pub static DATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]{4}-((0[1-9])|(1[0-2]))-([0-2][0-9]|3[0-1])$"));

/// `MM/YY`.
pub static CARD_EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^((0[1-9])|(1[0-2]))/[0-9]{2}$"));

pub static ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[a-zA-Z0-9\&'’‘,\-.:;/#\s@]*$"));

/// Matches addresses that point at a PO box or parcel locker (rejected for deliveries).
pub static PO_BOX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(P[.]?\s?O[.]?\s?Box)|(parcel locker)"));

/// Hong Kong identity card number without the check-digit parentheses.
pub static HKID: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-NP-Za-np-z]{1,2}[0-9]{6}[0-9Aa]$"));

pub static TRAVEL_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[A-Za-z0-9\-)(\s]{6,20}$"));

pub fn is_valid_email(input: &str) -> bool {
    EMAIL.is_match(input)
}

pub fn is_valid_name(input: &str) -> bool {
    NAME.is_match(input)
}

pub fn is_valid_password(input: &str) -> bool {
    PASSWORD.is_match(input)
}

pub fn is_valid_contact(input: &str) -> bool {
    CONTACT.is_match(input)
}

pub fn is_valid_date(input: &str) -> bool {
    DATE.is_match(input)
}

/// A deliverable street address: allowed characters and no PO box.
pub fn is_valid_address(input: &str) -> bool {
    ADDRESS.is_match(input) && !PO_BOX.is_match(input)
}

pub fn is_valid_hkid(input: &str) -> bool {
    HKID.is_match(input)
}

pub fn is_valid_travel_document(input: &str) -> bool {
    TRAVEL_DOCUMENT.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_plain_latin_letters() {
        assert!(is_valid_name("John"));
        assert!(is_valid_name("John Doe"));
        assert!(!is_valid_name("John$"));
        assert!(!is_valid_name("John123"));
        assert!(!is_valid_name("Johnâ‚¬"));
        assert!(!is_valid_name("John 😁"));
    }

    #[test]
    fn emails_need_a_domain() {
        assert!(is_valid_email("john.doe@prenetics.com"));
        assert!(is_valid_email("demo+circle@example.co.uk"));
        assert!(!is_valid_email("john.doe@.com"));
        assert!(!is_valid_email("john.doeprenetics.com"));
        assert!(!is_valid_email("john.doe@prenetics"));
    }

    #[test]
    fn addresses_reject_symbols_and_po_boxes() {
        assert!(is_valid_address("Shop LA303, 3/F"));
        assert!(is_valid_address("K11 Musea, Tsim Sha Tsui, HK"));
        assert!(!is_valid_address("Shop LA303, 3/F !"));
        assert!(!is_valid_address("P.O. Box 123"));
        assert!(!is_valid_address("Parcel Locker 7"));
    }

    #[test]
    fn passwords_have_bounded_length() {
        assert!(is_valid_password("abcd1234!"));
        assert!(!is_valid_password("short"));
        assert!(!is_valid_password(&"a".repeat(51)));
        assert!(!is_valid_password("with space1"));
    }

    #[test]
    fn numeric_formats() {
        assert!(is_valid_contact("87654321"));
        assert!(!is_valid_contact("8765-4321"));
        assert!(is_valid_date("1989-04-11"));
        assert!(!is_valid_date("1989-13-11"));
        assert!(CARD_EXPIRY.is_match("04/27"));
        assert!(!CARD_EXPIRY.is_match("13/27"));
        assert!(DECIMAL.is_match("80.5"));
        assert!(!DECIMAL.is_match("0.5"));
    }

    #[test]
    fn identity_documents() {
        assert!(is_valid_hkid("A1234567"));
        assert!(is_valid_hkid("AB987654A"));
        assert!(!is_valid_hkid("O1234567"));
        assert!(!is_valid_hkid("A123456"));
        assert!(is_valid_travel_document("K1234(56)"));
        assert!(!is_valid_travel_document("K12"));
    }
}
