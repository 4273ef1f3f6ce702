use std::fmt::Display;

use thiserror::Error;

/// Number of digits a buyer must supply on the exchange form.
pub const FORM_CARD_DIGITS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardNumberError {
    #[error("A card number must contain exactly 16 digits")]
    InvalidLength,
    #[error("A card number may only contain digits and spaces")]
    InvalidCharacters,
}

//--------------------------------------      CardNumber       ---------------------------------------------------------
/// A payment card number, stored as bare digits.
///
/// `CardNumber` only guarantees the *form* rules (16 digits once spaces are removed). Whether the number passes the
/// Luhn checksum is a separate question, answered by [`CardNumber::is_luhn_valid`], because the bank is the party that
/// ultimately rejects bad cards.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn parse(input: &str) -> Result<Self, CardNumberError> {
        let digits: String = input.chars().filter(|c| *c != ' ').collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardNumberError::InvalidCharacters);
        }
        if digits.len() != FORM_CARD_DIGITS {
            return Err(CardNumberError::InvalidLength);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_luhn_valid(&self) -> bool {
        luhn_check(&self.0)
    }

    pub fn masked(&self) -> String {
        mask_card_number(&self.0)
    }
}

impl Display for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

// Never leak the full number through debug output either.
impl std::fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CardNumber({})", self.masked())
    }
}

impl From<CardNumber> for String {
    fn from(card: CardNumber) -> Self {
        card.0
    }
}

/// Strips everything but ASCII digits from the input.
pub fn normalize_card_number(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Validates a card number with the Luhn checksum.
///
/// Non-digit characters are ignored. Numbers with fewer than 13 or more than 19 digits are rejected outright.
pub fn luhn_check(input: &str) -> bool {
    let digits = normalize_card_number(input);
    if !(13..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Masks a card number as `1234 **** **** 5678`. Spaces in the input are ignored. Inputs too short to mask safely are
/// replaced entirely.
pub fn mask_card_number(input: &str) -> String {
    let digits: String = input.chars().filter(|c| *c != ' ').collect();
    if digits.len() < 8 || !digits.is_ascii() {
        return "**** **** **** ****".to_string();
    }
    format!("{} **** **** {}", &digits[..4], &digits[digits.len() - 4..])
}
