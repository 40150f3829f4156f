use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_core::{DomainError, DomainResult, ProductId, SkuCode};

/// Catalog entry: a sellable product variant.
///
/// Catalog rows are plain entities; the interesting lifecycle lives in the
/// order path, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku_code: SkuCode,
    name: String,
    description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    price: u64,
    created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        sku_code: SkuCode,
        name: impl Into<String>,
        description: Option<String>,
        price: u64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }

        Ok(Self {
            id,
            sku_code,
            name,
            description,
            price,
            created_at,
        })
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn sku_code(&self) -> &SkuCode {
        &self.sku_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sku() -> SkuCode {
        SkuCode::new("iphone-13").unwrap()
    }

    #[test]
    fn product_with_valid_fields_is_accepted() {
        let p = Product::new(
            ProductId::new(),
            sku(),
            "iPhone 13",
            Some("128GB, midnight".to_string()),
            119_900,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(p.name(), "iPhone 13");
        assert_eq!(p.price(), 119_900);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Product::new(ProductId::new(), sku(), "   ", None, 100, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    proptest! {
        #[test]
        fn any_nonblank_name_and_price_is_accepted(
            name in "[a-zA-Z0-9 ]{1,40}",
            price in 0u64..10_000_000,
        ) {
            prop_assume!(!name.trim().is_empty());
            let p = Product::new(ProductId::new(), sku(), name.clone(), None, price, Utc::now());
            prop_assert!(p.is_ok());
            prop_assert_eq!(p.unwrap().price(), price);
        }
    }
}
