//! The revaluation distributor.
//!
//! Spreads a manual added value across the open cost layers of a product
//! and derives the product's new standard price. This is the computational
//! core of the crate; everything around it is wiring.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockval_core::{
    round_price, AccountId, CompanyId, CostLayer, CostingMethod, DistributionPolicy, LayerId,
    LayerStack, ProductId,
};
use thiserror::Error;

/// Errors that can reject a revaluation.
///
/// All of these are validation failures surfaced to the operator before
/// anything is written; none are retried or downgraded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevaluationError {
    /// Nothing is on hand, so there is nothing to revalue.
    #[error("product {product} has no quantity on hand to revalue")]
    NoQuantity {
        /// The product that was requested.
        product: ProductId,
    },

    /// The requested adjustment is zero, which would be a no-op.
    #[error("the added value must not be zero")]
    ZeroAdjustment,

    /// The revaluation configuration cannot be applied.
    #[error("invalid revaluation configuration: {reason}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// Applying the adjustment would push a layer's remaining value below
    /// zero. The whole request is rejected; no deltas apply.
    #[error("layer {layer} would be left with a negative remaining value ({value})")]
    NegativeLayerValue {
        /// The layer that would go negative.
        layer: LayerId,
        /// The remaining value the layer would end up with.
        value: Decimal,
    },
}

/// A manual revaluation request, fully resolved.
///
/// `policy` is already parsed here: resolving the configured policy string
/// (and rejecting unknown values) happens at the engine boundary, before
/// any computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevaluationRequest {
    /// Product whose layers are being revalued.
    pub product: ProductId,
    /// Company the valuation belongs to.
    pub company: CompanyId,
    /// Signed value to inject into the on-hand inventory value.
    pub added_value: Decimal,
    /// How the adjustment is split across layers.
    pub policy: DistributionPolicy,
    /// Costing method of the product.
    pub method: CostingMethod,
    /// Operator-supplied reason, kept in the correction layer description.
    pub reason: Option<String>,
    /// Counterpart account for the balancing entry.
    pub target_account: AccountId,
}

/// Value adjustment computed for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDelta {
    /// The layer the delta applies to.
    pub layer: LayerId,
    /// Signed change to the layer's remaining value.
    pub delta: Decimal,
    /// Remaining value after the delta is applied. Never negative.
    pub new_remaining_value: Decimal,
}

/// Outcome of a feasible distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevaluationResult {
    /// Per-layer deltas, in the input (newest-first) order. Their sum
    /// equals the requested added value exactly.
    pub deltas: Vec<LayerDelta>,
    /// Standard price before the adjustment, at the configured precision.
    pub previous_price: Decimal,
    /// Standard price after the adjustment, at the configured precision.
    pub new_price: Decimal,
    /// Total remaining value across all layers after the adjustment.
    pub new_total_value: Decimal,
    /// Total quantity on hand. Revaluation never changes it.
    pub total_quantity: Decimal,
    /// Value of the correction layer to record, equal to the added value.
    pub correction_value: Decimal,
}

impl RevaluationResult {
    /// Narration for the correction layer and its accounting entry.
    #[must_use]
    pub fn description(&self, reason: Option<&str>) -> String {
        let reason = match reason {
            Some(r) if !r.trim().is_empty() => r,
            _ => "No Reason Given",
        };
        format!(
            "Manual Stock Valuation: {reason}. Product cost updated from {} to {}.",
            self.previous_price.normalize(),
            self.new_price.normalize()
        )
    }
}

/// Distribute `request.added_value` across the open layers of a product.
///
/// Layers are walked in the given newest-first order. Every layer but the
/// last takes its rounded proportional share; the last layer (the oldest)
/// takes whatever is left of the added value, so the deltas always sum to
/// it exactly. The running total stays unrounded until that final
/// subtraction. The walk is rejected wholesale if any layer would end up
/// with a negative remaining value.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use stockval_core::{
///     AccountId, CompanyId, CostLayer, CostingMethod, DistributionPolicy, LayerId, LayerStack,
///     ProductId,
/// };
/// use stockval_revaluation::{distribute, RevaluationRequest};
///
/// let layers = LayerStack::from_newest_first(vec![
///     CostLayer::new(LayerId::new(), dec!(10), dec!(40)),
///     CostLayer::new(LayerId::new(), dec!(10), dec!(20)),
/// ]);
/// let request = RevaluationRequest {
///     product: ProductId::new(),
///     company: CompanyId::new(),
///     added_value: dec!(20),
///     policy: DistributionPolicy::ByQuantity,
///     method: CostingMethod::Average,
///     reason: None,
///     target_account: AccountId::new(),
/// };
///
/// let result = distribute(&request, &layers, 2).unwrap();
/// assert_eq!(result.new_price, dec!(4));
/// assert_eq!(result.new_total_value, dec!(80));
/// ```
pub fn distribute(
    request: &RevaluationRequest,
    layers: &LayerStack,
    precision: u32,
) -> Result<RevaluationResult, RevaluationError> {
    let total_quantity = layers.total_quantity();
    if total_quantity.is_zero() {
        return Err(RevaluationError::NoQuantity {
            product: request.product,
        });
    }
    if request.added_value.is_zero() {
        return Err(RevaluationError::ZeroAdjustment);
    }

    let total_value = layers.total_value();
    if request.policy == DistributionPolicy::ByValue && total_value.is_zero() {
        return Err(RevaluationError::InvalidConfiguration {
            reason: "cannot distribute by value: the total remaining value is zero".to_string(),
        });
    }

    let mut deltas = Vec::with_capacity(layers.len());
    let mut applied = Decimal::ZERO;

    for (i, layer) in layers.layers().iter().enumerate() {
        let delta = if i + 1 == layers.len() {
            // The last layer absorbs the rounding remainder so the
            // distributed total is exact.
            request.added_value - applied
        } else {
            let weight = match request.policy {
                DistributionPolicy::ByQuantity => layer.remaining_qty / total_quantity,
                DistributionPolicy::ByValue => layer.remaining_value / total_value,
            };
            round_price(request.added_value * weight, precision)
        };

        let new_remaining_value = layer.remaining_value + delta;
        if new_remaining_value < Decimal::ZERO {
            return Err(RevaluationError::NegativeLayerValue {
                layer: layer.id,
                value: new_remaining_value,
            });
        }

        applied += delta;
        deltas.push(LayerDelta {
            layer: layer.id,
            delta,
            new_remaining_value,
        });
    }

    let (previous_price, new_price) =
        standard_prices(request, layers, &deltas, total_value, total_quantity, precision)?;

    Ok(RevaluationResult {
        deltas,
        previous_price,
        new_price,
        new_total_value: total_value + request.added_value,
        total_quantity,
        correction_value: request.added_value,
    })
}

/// Standard price before and after the adjustment.
///
/// Average cost blends every layer; FIFO follows the layer the next
/// consumption would draw from, which is the oldest layer still holding
/// quantity (depleted layers never price the product).
fn standard_prices(
    request: &RevaluationRequest,
    layers: &LayerStack,
    deltas: &[LayerDelta],
    total_value: Decimal,
    total_quantity: Decimal,
    precision: u32,
) -> Result<(Decimal, Decimal), RevaluationError> {
    match request.method {
        CostingMethod::Average => Ok((
            round_price(total_value / total_quantity, precision),
            round_price(
                (total_value + request.added_value) / total_quantity,
                precision,
            ),
        )),
        CostingMethod::Fifo => {
            let Some(idx) = layers.layers().iter().rposition(CostLayer::is_open) else {
                return Err(RevaluationError::NoQuantity {
                    product: request.product,
                });
            };
            let oldest = &layers.layers()[idx];
            Ok((
                round_price(oldest.remaining_value / oldest.remaining_qty, precision),
                round_price(
                    deltas[idx].new_remaining_value / oldest.remaining_qty,
                    precision,
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn layer(qty: Decimal, value: Decimal) -> CostLayer {
        CostLayer::new(LayerId::new(), qty, value)
    }

    fn request(added_value: Decimal, policy: DistributionPolicy, method: CostingMethod) -> RevaluationRequest {
        RevaluationRequest {
            product: ProductId::new(),
            company: CompanyId::new(),
            added_value,
            policy,
            method,
            reason: None,
            target_account: AccountId::new(),
        }
    }

    #[test]
    fn test_single_layer_takes_the_whole_value() {
        let layers = LayerStack::from_newest_first(vec![layer(dec!(4), dec!(10))]);
        let req = request(dec!(2.5), DistributionPolicy::ByQuantity, CostingMethod::Average);

        let result = distribute(&req, &layers, 2).unwrap();

        assert_eq!(result.deltas.len(), 1);
        assert_eq!(result.deltas[0].delta, dec!(2.5));
        assert_eq!(result.deltas[0].new_remaining_value, dec!(12.5));
        assert_eq!(result.new_total_value, dec!(12.5));
    }

    #[test]
    fn test_empty_stack_has_no_quantity() {
        let req = request(dec!(5), DistributionPolicy::ByQuantity, CostingMethod::Average);
        let err = distribute(&req, &LayerStack::new(), 2).unwrap_err();

        assert!(matches!(err, RevaluationError::NoQuantity { .. }));
    }

    #[test]
    fn test_zero_added_value_is_rejected() {
        let layers = LayerStack::from_newest_first(vec![layer(dec!(1), dec!(1))]);
        let req = request(Decimal::ZERO, DistributionPolicy::ByQuantity, CostingMethod::Average);

        let err = distribute(&req, &layers, 2).unwrap_err();
        assert_eq!(err, RevaluationError::ZeroAdjustment);
    }

    #[test]
    fn test_by_value_needs_nonzero_total_value() {
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(5), dec!(10)),
            layer(dec!(5), dec!(-10)),
        ]);
        let req = request(dec!(3), DistributionPolicy::ByValue, CostingMethod::Average);

        let err = distribute(&req, &layers, 2).unwrap_err();
        assert!(matches!(err, RevaluationError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_negative_check_hits_non_final_layers_too() {
        // The newest layer carries almost no value but most of the quantity,
        // so a by-quantity write-down lands mostly on it.
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(9), dec!(0.50)),
            layer(dec!(1), dec!(20)),
        ]);
        let req = request(dec!(-10), DistributionPolicy::ByQuantity, CostingMethod::Average);

        let err = distribute(&req, &layers, 2).unwrap_err();
        match err {
            RevaluationError::NegativeLayerValue { layer: id, value } => {
                assert_eq!(id, layers.layers()[0].id);
                assert_eq!(value, dec!(-8.50));
            }
            other => panic!("expected NegativeLayerValue, got {other:?}"),
        }
    }

    #[test]
    fn test_remainder_lands_on_the_oldest_layer() {
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(1), dec!(1)),
            layer(dec!(1), dec!(1)),
            layer(dec!(1), dec!(1)),
        ]);
        let req = request(dec!(1), DistributionPolicy::ByQuantity, CostingMethod::Average);

        let result = distribute(&req, &layers, 2).unwrap();
        let deltas: Vec<Decimal> = result.deltas.iter().map(|d| d.delta).collect();

        assert_eq!(deltas, vec![dec!(0.33), dec!(0.33), dec!(0.34)]);
        assert_eq!(deltas.iter().sum::<Decimal>(), dec!(1));
    }

    #[test]
    fn test_running_total_stays_unrounded() {
        // An added value finer than the precision still sums exactly: the
        // sub-cent remainder ends up in the final layer's delta.
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(1), dec!(1)),
            layer(dec!(1), dec!(1)),
        ]);
        let req = request(dec!(1.005), DistributionPolicy::ByQuantity, CostingMethod::Average);

        let result = distribute(&req, &layers, 2).unwrap();

        assert_eq!(result.deltas[0].delta, dec!(0.50));
        assert_eq!(result.deltas[1].delta, dec!(0.505));
        assert_eq!(
            result.deltas.iter().map(|d| d.delta).sum::<Decimal>(),
            dec!(1.005)
        );
    }

    #[test]
    fn test_fifo_price_skips_depleted_oldest_layer() {
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(10), dec!(40)),
            layer(dec!(10), dec!(20)),
            layer(dec!(0), dec!(0)),
        ]);
        let req = request(dec!(20), DistributionPolicy::ByQuantity, CostingMethod::Fifo);

        let result = distribute(&req, &layers, 2).unwrap();

        // The depleted layer absorbs nothing by quantity and never prices
        // the product; the 10 @ 20 lot does.
        assert_eq!(result.previous_price, dec!(2));
        assert_eq!(result.new_price, dec!(3));
    }

    #[test]
    fn test_description_with_and_without_reason() {
        let layers = LayerStack::from_newest_first(vec![
            layer(dec!(10), dec!(40)),
            layer(dec!(10), dec!(20)),
        ]);
        let req = request(dec!(20), DistributionPolicy::ByQuantity, CostingMethod::Average);
        let result = distribute(&req, &layers, 2).unwrap();

        assert_eq!(
            result.description(Some("yearly appraisal")),
            "Manual Stock Valuation: yearly appraisal. Product cost updated from 3 to 4."
        );
        assert_eq!(
            result.description(None),
            "Manual Stock Valuation: No Reason Given. Product cost updated from 3 to 4."
        );
        assert_eq!(
            result.description(Some("  ")),
            "Manual Stock Valuation: No Reason Given. Product cost updated from 3 to 4."
        );
    }
}
