//! Cost layers and the ordered stack of open layers for a product.
//!
//! A [`CostLayer`] is a snapshot of one valuation increment: the quantity
//! still on hand from that increment and the value it is carried at. A
//! [`LayerStack`] holds every open layer of a product, newest first, and is
//! the unit the revaluation engine works on.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::LayerId;

/// A snapshot of one outstanding cost layer.
///
/// Layers are immutable inputs here: revaluation reads `remaining_qty` and
/// `remaining_value` and reports value deltas; it never mutates the layer
/// records themselves.
///
/// # Examples
///
/// ```
/// use stockval_core::{CostLayer, LayerId};
/// use rust_decimal_macros::dec;
///
/// let layer = CostLayer::new(LayerId::new(), dec!(10), dec!(40));
/// assert_eq!(layer.unit_value(), Some(dec!(4)));
/// assert!(layer.is_open());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostLayer {
    /// Identifier of the underlying valuation record.
    pub id: LayerId,
    /// Quantity still on hand out of this layer. Never negative.
    pub remaining_qty: Decimal,
    /// Value the remaining quantity is carried at. May be negative for
    /// average-cost layers that went negative historically.
    pub remaining_value: Decimal,
    /// Creation date of the layer, when known.
    pub date: Option<NaiveDate>,
}

impl CostLayer {
    /// Create a layer snapshot.
    #[must_use]
    pub const fn new(id: LayerId, remaining_qty: Decimal, remaining_value: Decimal) -> Self {
        Self {
            id,
            remaining_qty,
            remaining_value,
            date: None,
        }
    }

    /// Attach a creation date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether any quantity is left in this layer.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.remaining_qty.is_zero()
    }

    /// Per-unit value of the remaining quantity, `None` once depleted.
    #[must_use]
    pub fn unit_value(&self) -> Option<Decimal> {
        if self.remaining_qty.is_zero() {
            None
        } else {
            Some(self.remaining_value / self.remaining_qty)
        }
    }
}

impl fmt::Display for CostLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} units @ {}", self.remaining_qty, self.remaining_value)?;
        if let Some(date) = self.date {
            write!(f, " ({date})")?;
        }
        Ok(())
    }
}

/// Every open layer of one product, newest first.
///
/// The ordering is significant twice over: per-layer deltas are computed in
/// this order, and the final layer processed (the oldest) absorbs whatever
/// rounding remainder is left so the distributed total is exact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<CostLayer>,
}

impl LayerStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from layers already ordered newest first.
    #[must_use]
    pub fn from_newest_first(layers: Vec<CostLayer>) -> Self {
        Self { layers }
    }

    /// The layers, newest first.
    #[must_use]
    pub fn layers(&self) -> &[CostLayer] {
        &self.layers
    }

    /// Number of layers, including depleted ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack holds no layers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total quantity on hand across all layers.
    #[must_use]
    pub fn total_quantity(&self) -> Decimal {
        self.layers.iter().map(|l| l.remaining_qty).sum()
    }

    /// Total remaining value across all layers.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.layers.iter().map(|l| l.remaining_value).sum()
    }

    /// The oldest layer that still has quantity on hand.
    ///
    /// Under FIFO this is the next lot consumption would draw from, and the
    /// layer the standard price follows.
    #[must_use]
    pub fn oldest_open(&self) -> Option<&CostLayer> {
        self.layers.iter().rev().find(|l| l.is_open())
    }
}

impl fmt::Display for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.layers.is_empty() {
            return write!(f, "(empty)");
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{layer}")?;
        }
        Ok(())
    }
}

impl FromIterator<CostLayer> for LayerStack {
    fn from_iter<I: IntoIterator<Item = CostLayer>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
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

    #[test]
    fn test_empty_stack() {
        let stack = LayerStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.total_quantity(), Decimal::ZERO);
        assert_eq!(stack.total_value(), Decimal::ZERO);
        assert!(stack.oldest_open().is_none());
    }

    #[test]
    fn test_totals() {
        let stack = LayerStack::from_newest_first(vec![
            layer(dec!(10), dec!(40)),
            layer(dec!(10), dec!(20)),
        ]);

        assert_eq!(stack.total_quantity(), dec!(20));
        assert_eq!(stack.total_value(), dec!(60));
    }

    #[test]
    fn test_total_value_can_be_negative() {
        let stack = LayerStack::from_newest_first(vec![
            layer(dec!(5), dec!(-12.50)),
            layer(dec!(5), dec!(10)),
        ]);

        assert_eq!(stack.total_value(), dec!(-2.50));
    }

    #[test]
    fn test_oldest_open_is_last_in_order() {
        let oldest = layer(dec!(10), dec!(20));
        let stack = LayerStack::from_newest_first(vec![layer(dec!(10), dec!(40)), oldest.clone()]);

        assert_eq!(stack.oldest_open(), Some(&oldest));
    }

    #[test]
    fn test_oldest_open_skips_depleted_layers() {
        let priced = layer(dec!(3), dec!(9));
        let stack = LayerStack::from_newest_first(vec![
            layer(dec!(2), dec!(8)),
            priced.clone(),
            layer(dec!(0), dec!(0)),
        ]);

        assert_eq!(stack.oldest_open(), Some(&priced));
    }

    #[test]
    fn test_unit_value() {
        let open = layer(dec!(4), dec!(10));
        assert_eq!(open.unit_value(), Some(dec!(2.5)));

        let depleted = layer(dec!(0), dec!(0));
        assert_eq!(depleted.unit_value(), None);
        assert!(!depleted.is_open());
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let newest = layer(dec!(1), dec!(4));
        let oldest = layer(dec!(1), dec!(2));
        let stack: LayerStack = vec![newest.clone(), oldest.clone()].into_iter().collect();

        assert_eq!(stack.layers(), &[newest, oldest]);
    }

    #[test]
    fn test_display() {
        let stack = LayerStack::from_newest_first(vec![layer(dec!(10), dec!(40))]);
        let s = format!("{stack}");
        assert!(s.contains("10 units @ 40"));

        assert_eq!(format!("{}", LayerStack::new()), "(empty)");
    }
}
