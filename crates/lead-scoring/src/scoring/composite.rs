//! Composite scoring.
//!
//! Order is fixed: weighted base, then context multiplier on the base only,
//! then flat boosts, then the unweighted penalty, then the `[0, 100]` clamp.

use std::collections::BTreeMap;

use lead_core::constants::{DEFAULT_MAX_CONTEXT_MULTIPLIER, MAX_SCORE, MIN_SCORE};
use lead_core::types::collections::SmallVec2;
use lead_core::types::{CompositeBreakdown, DimensionScores};

/// Context factors that compound multiplicatively under a cap.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMultipliers {
    factors: SmallVec2<(String, f64)>,
    cap: f64,
}

impl Default for ContextMultipliers {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_MULTIPLIER)
    }
}

impl ContextMultipliers {
    /// A cap below 1.0 is raised to 1.0; a non-finite cap falls back to
    /// the default.
    pub fn new(cap: f64) -> Self {
        let cap = if cap.is_finite() {
            cap.max(1.0)
        } else {
            DEFAULT_MAX_CONTEXT_MULTIPLIER
        };
        Self {
            factors: SmallVec2::new(),
            cap,
        }
    }

    pub fn push(&mut self, name: impl Into<String>, factor: f64) {
        self.factors.push((name.into(), factor));
    }

    pub fn with(mut self, name: impl Into<String>, factor: f64) -> Self {
        self.push(name, factor);
        self
    }

    pub fn factors(&self) -> &[(String, f64)] {
        &self.factors
    }

    /// Product of all factors, capped.
    pub fn total(&self) -> f64 {
        let product: f64 = self.factors.iter().map(|(_, f)| f).product();
        product.clamp(0.0, self.cap)
    }
}

/// A flat additive term, capped on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBoost {
    pub name: String,
    pub raw: f64,
    pub cap: f64,
}

impl FlatBoost {
    pub fn new(name: impl Into<String>, raw: f64, cap: f64) -> Self {
        Self {
            name: name.into(),
            raw,
            cap,
        }
    }

    pub fn value(&self) -> f64 {
        if self.raw.is_nan() {
            return 0.0;
        }
        self.raw.clamp(0.0, self.cap)
    }
}

/// Composite score plus how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub score: f64,
    pub breakdown: CompositeBreakdown,
}

/// Weighted base scaled by the context multiplier and clamped.
pub fn compose(
    dimension_scores: &DimensionScores,
    weights: &BTreeMap<String, f64>,
    multipliers: &ContextMultipliers,
) -> f64 {
    compose_detailed(dimension_scores, weights, multipliers, &[], 0.0).score
}

/// Full composition with flat boosts and a penalty.
pub fn compose_detailed(
    dimension_scores: &DimensionScores,
    weights: &BTreeMap<String, f64>,
    multipliers: &ContextMultipliers,
    boosts: &[FlatBoost],
    penalty: f64,
) -> Composition {
    let base: f64 = weights
        .iter()
        .map(|(dimension, weight)| dimension_scores.get(dimension).copied().unwrap_or(0.0) * weight)
        .sum();
    let multiplier = multipliers.total();

    let mut applied = BTreeMap::new();
    let mut boost_total = 0.0;
    for boost in boosts {
        let value = boost.value();
        boost_total += value;
        *applied.entry(boost.name.clone()).or_insert(0.0) += value;
    }

    let raw = base * multiplier + boost_total + penalty;
    let score = if raw.is_nan() {
        MIN_SCORE
    } else {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    };

    Composition {
        score,
        breakdown: CompositeBreakdown {
            base,
            multiplier,
            boosts: applied,
            penalty,
            raw,
        },
    }
}
