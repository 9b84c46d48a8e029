//! Core types for stockval
//!
//! This crate provides the fundamental types used throughout the stockval
//! workspace:
//!
//! - [`CostLayer`] - One outstanding valuation increment of a product
//! - [`LayerStack`] - Every open layer of a product, newest first
//! - [`CostingMethod`] - How the standard price is derived (average / FIFO)
//! - [`DistributionPolicy`] - How an adjustment is split across layers
//! - [`round_price`] - Half-away-from-zero rounding at a configured digit count
//! - Strongly-typed identifiers ([`ProductId`], [`LayerId`], ...)
//!
//! # Example
//!
//! ```
//! use stockval_core::{CostLayer, LayerId, LayerStack};
//! use rust_decimal_macros::dec;
//!
//! // Two receipts: 10 units at 2, then 10 units at 4 (newest first).
//! let stack = LayerStack::from_newest_first(vec![
//!     CostLayer::new(LayerId::new(), dec!(10), dec!(40)),
//!     CostLayer::new(LayerId::new(), dec!(10), dec!(20)),
//! ]);
//!
//! assert_eq!(stack.total_quantity(), dec!(20));
//! assert_eq!(stack.total_value(), dec!(60));
//!
//! // FIFO consumption would draw from the 10 @ 20 lot next.
//! assert_eq!(stack.oldest_open().unwrap().remaining_value, dec!(20));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ids;
pub mod layer;
pub mod method;
pub mod rounding;

pub use ids::{AccountId, CompanyId, EntryId, LayerId, ParseIdError, ProductId};
pub use layer::{CostLayer, LayerStack};
pub use method::{CostingMethod, DistributionPolicy};
pub use rounding::round_price;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
