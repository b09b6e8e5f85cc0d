//! User domain model

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Input format for birth dates
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Number of digits in a tax ID (CPF)
const TAX_ID_LEN: usize = 11;

/// A bank customer, identified by tax ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub tax_id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    /// Free-form: "street, number - district - city/state"
    pub address: String,
}

impl User {
    /// Build a user from raw form input, validating every field
    pub fn parse(tax_id: &str, name: &str, birth_date: &str, address: &str) -> Result<Self> {
        let tax_id = Self::normalize_tax_id(tax_id)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("name cannot be empty"));
        }

        let address = address.trim();
        if address.is_empty() {
            return Err(Error::validation("address cannot be empty"));
        }

        let birth_date = NaiveDate::parse_from_str(birth_date.trim(), BIRTH_DATE_FORMAT)
            .map_err(|_| Error::validation("birth date must be DD/MM/YYYY"))?;
        if birth_date > Utc::now().date_naive() {
            return Err(Error::validation("birth date cannot be in the future"));
        }

        Ok(Self {
            tax_id,
            name: name.to_string(),
            birth_date,
            address: address.to_string(),
        })
    }

    /// Strip formatting punctuation and require exactly 11 digits
    pub fn normalize_tax_id(raw: &str) -> Result<String> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | ' '))
            .collect();

        if digits.len() != TAX_ID_LEN || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(format!(
                "tax ID must contain exactly {} digits",
                TAX_ID_LEN
            )));
        }
        Ok(digits)
    }

    /// Birth date in the same format it was entered
    pub fn birth_date_display(&self) -> String {
        self.birth_date.format(BIRTH_DATE_FORMAT).to_string()
    }
}
