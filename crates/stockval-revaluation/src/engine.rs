//! Orchestration of a manual revaluation against its collaborators.
//!
//! [`RevaluationEngine`] resolves the configured policy and precision, runs
//! the distributor over the product's open layers, synthesizes the
//! correction layer and posts the balancing entry. Everything is computed
//! before the single posting call, so a failed validation leaves no partial
//! effects. Persisting the deltas together with the correction layer (and
//! serializing concurrent revaluations of one product) is the caller's
//! transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockval_core::{AccountId, CompanyId, CostingMethod, DistributionPolicy, EntryId, ProductId};

use crate::distribute::{distribute, RevaluationError, RevaluationRequest, RevaluationResult};
use crate::providers::{
    ConfigProvider, EntryPoster, LayerRepository, PrecisionProvider, PRODUCT_PRICE,
};

/// Operator input for one manual revaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualAdjustment {
    /// Product to revalue.
    pub product: ProductId,
    /// Company owning the valuation.
    pub company: CompanyId,
    /// Signed value to add to the on-hand inventory value.
    pub added_value: Decimal,
    /// Costing method of the product.
    pub method: CostingMethod,
    /// Reason recorded in the correction layer description.
    pub reason: Option<String>,
    /// Stock valuation account of the product.
    pub valuation_account: AccountId,
    /// Counterpart account chosen by the operator.
    pub target_account: AccountId,
}

/// The correction layer synthesized for a validated revaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionLayer {
    /// Value of the correction, equal to the requested added value.
    pub value: Decimal,
    /// Quantity of the correction layer: always zero, only value moves.
    pub quantity: Decimal,
    /// Narration, shared with the accounting entry.
    pub description: String,
    /// The balancing entry the layer is linked to.
    pub entry: EntryId,
}

/// Everything a caller must persist atomically for one revaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revaluation {
    /// The distribution outcome: per-layer deltas and new prices.
    pub result: RevaluationResult,
    /// The synthesized correction layer.
    pub correction: CorrectionLayer,
}

/// Runs manual revaluations against the injected collaborators.
#[derive(Debug)]
pub struct RevaluationEngine<L, P, C, A> {
    layers: L,
    precision: P,
    config: C,
    poster: A,
}

impl<L, P, C, A> RevaluationEngine<L, P, C, A>
where
    L: LayerRepository,
    P: PrecisionProvider,
    C: ConfigProvider,
    A: EntryPoster,
{
    /// Assemble an engine from its collaborators.
    pub const fn new(layers: L, precision: P, config: C, poster: A) -> Self {
        Self {
            layers,
            precision,
            config,
            poster,
        }
    }

    /// The entry poster, e.g. to inspect a recording journal in tests.
    pub const fn poster(&self) -> &A {
        &self.poster
    }

    /// Resolve the configured distribution policy.
    ///
    /// Unset falls back to distributing by quantity; an unrecognized value
    /// is rejected before any computation.
    fn resolve_policy(&self) -> Result<DistributionPolicy, RevaluationError> {
        match self.config.distribution_policy() {
            None => Ok(DistributionPolicy::default()),
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| RevaluationError::InvalidConfiguration { reason }),
        }
    }

    /// Validate and compute one manual revaluation, posting its entry.
    ///
    /// On success the returned [`Revaluation`] carries everything the
    /// caller must persist in one transaction: the per-layer deltas, the
    /// correction layer, and the id of the posted entry. On error nothing
    /// was posted.
    pub fn revalue(
        &mut self,
        adjustment: &ManualAdjustment,
    ) -> Result<Revaluation, RevaluationError> {
        let policy = self.resolve_policy()?;
        let layers = self.layers.list_open_layers(adjustment.product);
        let precision = self.precision.price_precision(PRODUCT_PRICE);
        tracing::debug!(
            product = %adjustment.product,
            layers = layers.len(),
            %policy,
            precision,
            "distributing manual revaluation"
        );

        let request = RevaluationRequest {
            product: adjustment.product,
            company: adjustment.company,
            added_value: adjustment.added_value,
            policy,
            method: adjustment.method,
            reason: adjustment.reason.clone(),
            target_account: adjustment.target_account,
        };
        let result = distribute(&request, &layers, precision)?;

        let description = result.description(adjustment.reason.as_deref());
        // Positive adjustments debit the valuation account; negative ones reverse.
        let (debit, credit) = if adjustment.added_value.is_sign_positive() {
            (adjustment.valuation_account, adjustment.target_account)
        } else {
            (adjustment.target_account, adjustment.valuation_account)
        };
        let entry = self
            .poster
            .post(debit, credit, adjustment.added_value.abs(), &description);
        tracing::info!(
            product = %adjustment.product,
            previous = %result.previous_price,
            new = %result.new_price,
            %entry,
            "manual revaluation validated"
        );

        Ok(Revaluation {
            correction: CorrectionLayer {
                value: result.correction_value,
                quantity: Decimal::ZERO,
                description,
                entry,
            },
            result,
        })
    }
}
