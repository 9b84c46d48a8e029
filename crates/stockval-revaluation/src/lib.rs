//! Manual stock revaluation engine.
//!
//! This crate distributes an operator-supplied "added value" across the
//! open cost layers of a product, derives the product's new standard price,
//! and produces the correction layer plus a balancing accounting entry
//! through an injected poster.
//!
//! The distribution itself is pure ([`distribute`]); [`RevaluationEngine`]
//! wires it to the collaborator seams in [`providers`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use stockval_core::{
//!     AccountId, CompanyId, CostLayer, CostingMethod, DistributionPolicy, LayerId, LayerStack,
//!     ProductId,
//! };
//! use stockval_revaluation::{distribute, RevaluationRequest};
//!
//! // Two receipts of 10 units, at 2 and then at 4 per unit.
//! let layers = LayerStack::from_newest_first(vec![
//!     CostLayer::new(LayerId::new(), dec!(10), dec!(40)),
//!     CostLayer::new(LayerId::new(), dec!(10), dec!(20)),
//! ]);
//!
//! let request = RevaluationRequest {
//!     product: ProductId::new(),
//!     company: CompanyId::new(),
//!     added_value: dec!(20),
//!     policy: DistributionPolicy::ByQuantity,
//!     method: CostingMethod::Average,
//!     reason: Some("yearly appraisal".to_string()),
//!     target_account: AccountId::new(),
//! };
//!
//! let result = distribute(&request, &layers, 2).unwrap();
//!
//! assert_eq!(result.previous_price, dec!(3));
//! assert_eq!(result.new_price, dec!(4));
//! assert_eq!(result.new_total_value, dec!(80));
//! // The deltas sum to the added value exactly.
//! let total: rust_decimal::Decimal = result.deltas.iter().map(|d| d.delta).sum();
//! assert_eq!(total, dec!(20));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod distribute;
mod engine;
pub mod providers;

pub use distribute::{
    distribute, LayerDelta, RevaluationError, RevaluationRequest, RevaluationResult,
};
pub use engine::{CorrectionLayer, ManualAdjustment, Revaluation, RevaluationEngine};
pub use providers::{
    ConfigProvider, EntryPoster, LayerRepository, MemoryConfig, MemoryJournal, MemoryLayers,
    PostedEntry, PrecisionProvider, StaticPrecision, PRODUCT_PRICE,
};
