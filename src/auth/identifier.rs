use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
    Invalid,
}

pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub fn is_phone_number(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Email wins when a string matches both shapes.
pub fn classify(identifier: &str) -> IdentifierKind {
    if is_email(identifier) {
        IdentifierKind::Email
    } else if is_phone_number(identifier) {
        IdentifierKind::Phone
    } else {
        IdentifierKind::Invalid
    }
}

/// A classified identifier in its stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Phone(String),
}

impl Identifier {
    /// Trims, classifies and normalises (emails are lowercased). `None` when invalid.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match classify(raw) {
            IdentifierKind::Email => Some(Identifier::Email(raw.to_lowercase())),
            IdentifierKind::Phone => Some(Identifier::Phone(raw.to_string())),
            IdentifierKind::Invalid => None,
        }
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Identifier::Email(_) => IdentifierKind::Email,
            Identifier::Phone(_) => IdentifierKind::Phone,
        }
    }
}
