//! Stock-keeping unit codes.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A stock-keeping unit code identifying a product variant.
///
/// Value object: compared by value, always non-empty, surrounding whitespace
/// stripped at construction. `Ord` so distinct-SKU sets iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuCode(String);

impl SkuCode {
    pub fn new(code: impl Into<String>) -> DomainResult<Self> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("sku code must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for SkuCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for SkuCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_code_is_trimmed() {
        let sku = SkuCode::new("  iphone-13  ").unwrap();
        assert_eq!(sku.as_str(), "iphone-13");
    }

    #[test]
    fn empty_sku_code_is_rejected() {
        assert!(SkuCode::new("").is_err());
        assert!(SkuCode::new("   ").is_err());
    }

    #[test]
    fn sku_codes_compare_by_value() {
        assert_eq!(SkuCode::new("a").unwrap(), SkuCode::new("a").unwrap());
        assert!(SkuCode::new("a").unwrap() < SkuCode::new("b").unwrap());
    }
}
