//! Collaborator seams for the revaluation engine.
//!
//! The engine never reaches into a database or a configuration store; it
//! talks to these traits. Memory-backed implementations are provided for
//! tests and small deployments.

use std::collections::HashMap;

use rust_decimal::Decimal;
use stockval_core::{AccountId, EntryId, LayerStack, ProductId};

/// Decimal-precision context key for product prices.
pub const PRODUCT_PRICE: &str = "Product Price";

/// Read access to the open cost layers of a product.
pub trait LayerRepository {
    /// All currently open layers of a product, newest first.
    fn list_open_layers(&self, product: ProductId) -> LayerStack;
}

/// Source of configured decimal precisions.
pub trait PrecisionProvider {
    /// Digit count configured for the given context, e.g. [`PRODUCT_PRICE`].
    fn price_precision(&self, context: &str) -> u32;
}

/// Source of the configured revaluation behavior.
pub trait ConfigProvider {
    /// The configured distribution policy string, if one was set.
    ///
    /// `None` falls back to distributing by quantity; an unrecognized value
    /// is rejected rather than silently defaulted.
    fn distribution_policy(&self) -> Option<String>;
}

/// Posts a balancing accounting entry for a computed adjustment.
pub trait EntryPoster {
    /// Post a two-line entry moving `amount` from `credit` to `debit`.
    fn post(
        &mut self,
        debit: AccountId,
        credit: AccountId,
        amount: Decimal,
        description: &str,
    ) -> EntryId;
}

/// Layer repository backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayers {
    stacks: HashMap<ProductId, LayerStack>,
}

impl MemoryLayers {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stack stored for a product.
    pub fn insert(&mut self, product: ProductId, stack: LayerStack) {
        self.stacks.insert(product, stack);
    }
}

impl LayerRepository for MemoryLayers {
    fn list_open_layers(&self, product: ProductId) -> LayerStack {
        self.stacks.get(&product).cloned().unwrap_or_default()
    }
}

/// The same precision for every context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPrecision(pub u32);

impl Default for StaticPrecision {
    fn default() -> Self {
        Self(2)
    }
}

impl PrecisionProvider for StaticPrecision {
    fn price_precision(&self, _context: &str) -> u32 {
        self.0
    }
}

/// Company-level configuration held in memory.
///
/// Mirrors the company setting that selects how revaluations distribute:
/// by quantity unless configured otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryConfig {
    distribution_policy: Option<String>,
}

impl MemoryConfig {
    /// Configuration with no policy set (distributes by quantity).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distribution policy string, as an operator would.
    #[must_use]
    pub fn with_distribution_policy(mut self, policy: impl Into<String>) -> Self {
        self.distribution_policy = Some(policy.into());
        self
    }
}

impl ConfigProvider for MemoryConfig {
    fn distribution_policy(&self) -> Option<String> {
        self.distribution_policy.clone()
    }
}

/// An entry recorded by [`MemoryJournal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedEntry {
    /// Identifier handed back to the caller.
    pub id: EntryId,
    /// Debited account.
    pub debit: AccountId,
    /// Credited account.
    pub credit: AccountId,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// Entry narration.
    pub description: String,
}

/// Entry poster that records entries in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryJournal {
    entries: Vec<PostedEntry>,
}

impl MemoryJournal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries posted so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[PostedEntry] {
        &self.entries
    }
}

impl EntryPoster for MemoryJournal {
    fn post(
        &mut self,
        debit: AccountId,
        credit: AccountId,
        amount: Decimal,
        description: &str,
    ) -> EntryId {
        let id = EntryId::new();
        self.entries.push(PostedEntry {
            id,
            debit,
            credit,
            amount,
            description: description.to_string(),
        });
        id
    }
}
