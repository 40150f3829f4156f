//! `shopkit-products` — product catalog domain.

pub mod product;

pub use product::Product;
