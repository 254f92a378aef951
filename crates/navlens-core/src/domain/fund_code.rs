use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const FUND_CODE_LEN: usize = 6;

/// Six-digit open-end fund code as listed on Eastmoney.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FundCode(String);

impl FundCode {
    /// Parse a fund code, trimming surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyFundCode);
        }

        let len = trimmed.chars().count();
        if len != FUND_CODE_LEN {
            return Err(ValidationError::FundCodeLength {
                len,
                expected: FUND_CODE_LEN,
            });
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_digit() {
                return Err(ValidationError::FundCodeInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FundCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FundCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for FundCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FundCode> for String {
    fn from(value: FundCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_code() {
        let parsed = FundCode::parse(" 161725 ").expect("code should parse");
        assert_eq!(parsed.as_str(), "161725");
    }

    #[test]
    fn rejects_wrong_length() {
        let err = FundCode::parse("12345").expect_err("must fail");
        assert!(matches!(err, ValidationError::FundCodeLength { len: 5, .. }));
    }

    #[test]
    fn rejects_non_digits() {
        let err = FundCode::parse("16172X").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::FundCodeInvalidChar { ch: 'X', index: 5 }
        ));
    }
}
