//! Costing methods and distribution policies.
//!
//! Both enums parse from the configuration strings the surrounding system
//! stores. Parsing is strict: an unrecognized value is an error, never a
//! silent fallback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inventory costing method of the product being revalued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostingMethod {
    /// Moving weighted average: the standard price blends every open layer.
    Average,
    /// First in, first out: the standard price follows the oldest open layer.
    Fifo,
}

impl FromStr for CostingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average" => Ok(Self::Average),
            "fifo" => Ok(Self::Fifo),
            _ => Err(format!("unknown costing method: {s}")),
        }
    }
}

impl fmt::Display for CostingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::Fifo => write!(f, "fifo"),
        }
    }
}

/// How a manual adjustment is split across the open layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistributionPolicy {
    /// Each layer takes a share proportional to its remaining quantity.
    #[default]
    ByQuantity,
    /// Each layer takes a share proportional to its remaining value.
    ByValue,
}

impl FromStr for DistributionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quantity" => Ok(Self::ByQuantity),
            "value" => Ok(Self::ByValue),
            _ => Err(format!("unknown distribution policy: {s}")),
        }
    }
}

impl fmt::Display for DistributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByQuantity => write!(f, "quantity"),
            Self::ByValue => write!(f, "value"),
        }
    }
}
