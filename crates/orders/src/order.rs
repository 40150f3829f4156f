use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkit_core::{DomainError, DomainResult, OrderId, SkuCode};

/// Raw line item as submitted by a caller, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub sku_code: String,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
    pub quantity: u32,
}

/// One line of an order. Owned exclusively by its parent [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    sku_code: SkuCode,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
    quantity: u32,
}

impl OrderLineItem {
    pub fn new(sku_code: SkuCode, unit_price: u64, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            sku_code,
            unit_price,
            quantity,
        })
    }

    pub fn from_request(request: LineItemRequest) -> DomainResult<Self> {
        let sku_code = SkuCode::new(request.sku_code)?;
        Self::new(sku_code, request.unit_price, request.quantity)
    }

    pub fn sku_code(&self) -> &SkuCode {
        &self.sku_code
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// An order as decided by the placement coordinator.
///
/// Built in memory, durable only once admitted, immutable after that
/// (append-only persistence; there is no update or delete path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    line_items: Vec<OrderLineItem>,
    placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: OrderId,
        line_items: Vec<OrderLineItem>,
        placed_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if line_items.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one line item",
            ));
        }

        Ok(Self {
            id,
            line_items,
            placed_at,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn line_items(&self) -> &[OrderLineItem] {
        &self.line_items
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Distinct SKUs across all line items.
    ///
    /// Duplicates are allowed in line items but stock is checked once per
    /// distinct SKU; the set is ordered so batched lookups are deterministic.
    pub fn distinct_skus(&self) -> BTreeSet<SkuCode> {
        self.line_items
            .iter()
            .map(|line| line.sku_code().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sku(code: &str) -> SkuCode {
        SkuCode::new(code).unwrap()
    }

    fn line(code: &str, quantity: u32) -> OrderLineItem {
        OrderLineItem::new(sku(code), 150, quantity).unwrap()
    }

    #[test]
    fn zero_quantity_line_item_is_rejected() {
        let err = OrderLineItem::new(sku("a"), 150, 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_sku_in_request_is_rejected() {
        let err = OrderLineItem::from_request(LineItemRequest {
            sku_code: "  ".to_string(),
            unit_price: 150,
            quantity: 1,
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn order_without_line_items_is_rejected() {
        let err = Order::new(OrderId::new(), Vec::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn distinct_skus_deduplicates_line_items() {
        let order = Order::new(
            OrderId::new(),
            vec![line("a", 2), line("b", 1), line("a", 5)],
            Utc::now(),
        )
        .unwrap();

        let skus = order.distinct_skus();
        assert_eq!(skus.len(), 2);
        assert!(skus.contains(&sku("a")));
        assert!(skus.contains(&sku("b")));
    }

    proptest! {
        #[test]
        fn valid_requests_always_map_to_line_items(
            code in "[a-z0-9-]{1,20}",
            unit_price in 0u64..1_000_000,
            quantity in 1u32..10_000,
        ) {
            let item = OrderLineItem::from_request(LineItemRequest {
                sku_code: code.clone(),
                unit_price,
                quantity,
            });
            prop_assert!(item.is_ok());
            let item = item.unwrap();
            prop_assert_eq!(item.sku_code().as_str(), code.as_str());
            prop_assert_eq!(item.quantity(), quantity);
        }

        #[test]
        fn distinct_skus_covers_every_line_exactly_once(
            codes in proptest::collection::vec("[a-z]{1,4}", 1..20),
        ) {
            let lines: Vec<OrderLineItem> = codes
                .iter()
                .map(|c| OrderLineItem::new(SkuCode::new(c.clone()).unwrap(), 100, 1).unwrap())
                .collect();
            let order = Order::new(OrderId::new(), lines, Utc::now()).unwrap();

            let skus = order.distinct_skus();
            prop_assert!(skus.len() <= codes.len());
            for line in order.line_items() {
                prop_assert!(skus.contains(line.sku_code()));
            }
        }
    }
}
