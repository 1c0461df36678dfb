//! Risk-adjusted cost estimation for variable-rate tariffs.
//!
//! Customer models use the estimator to compare competing tariff offers before subscribing. For a
//! variable-rate tariff, four values must be combined into a single price estimate: the broker's
//! claimed expected mean price, the broker's committed price ceiling, the realized price actually
//! paid under the tariff so far, and the volume of energy sold through it. A realized price backed
//! by substantial sold volume is more predictive than the broker's claims, so the blend shifts
//! trust towards it as volume grows:
//!
//! ```text
//! alpha = 1 - wt_realized * (1 - 1 / (1 + sold / sold_threshold))
//! value = alpha * (norm_wt_expected * expected_mean + norm_wt_max * max_value)
//!         + (1 - alpha) * realized_price
//! ```
//!
//! Where a tariff combines several variable rates, the tariff's own charge lookup applies
//! [`PriceBlend::weighted_value`] to each rate and weights the results by usage.
use crate::clock::Clock;
use crate::tariff::{Rate, Tariff};
use crate::units::{Dimensionless, Energy, Money, MoneyPerEnergy};
use anyhow::{Result, ensure};
use itertools::Itertools;
use log::warn;

/// Default weight on the claimed expected mean price
const DEFAULT_WT_EXPECTED: f64 = 0.6;

/// Default weight on the claimed price ceiling
const DEFAULT_WT_MAX: f64 = 0.4;

/// Default maximum trust in the realized price
const DEFAULT_WT_REALIZED: f64 = 0.8;

/// Default sold volume at which realized-price confidence reaches half its maximum weight
const DEFAULT_SOLD_THRESHOLD: f64 = 10000.0;

/// The configured weighting parameters for tariff evaluation.
///
/// The weights on the two claimed price parameters are kept normalized so they always sum to one;
/// the normalized values are recomputed whenever the parameters are replaced. Weights persist
/// across estimation calls, so one set can serve a customer model through many tariff
/// comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationWeights {
    wt_expected: Dimensionless,
    wt_max: Dimensionless,
    wt_realized: Dimensionless,
    sold_threshold: Energy,
    norm_wt_expected: Dimensionless,
    norm_wt_max: Dimensionless,
}

impl EvaluationWeights {
    /// Create a set of evaluation weights, normalizing the claimed-price weights.
    ///
    /// `wt_realized` is clamped to [0, 1] with a logged warning when it falls outside that range.
    /// Negative claimed-price weights, a zero claimed-price weight sum and a non-positive sold
    /// volume threshold are rejected.
    pub fn new(
        wt_expected: Dimensionless,
        wt_max: Dimensionless,
        wt_realized: Dimensionless,
        sold_threshold: Energy,
    ) -> Result<Self> {
        ensure!(
            wt_expected.0 >= 0.0,
            "expected-mean weight must be non-negative, got {}",
            wt_expected.0
        );
        ensure!(
            wt_max.0 >= 0.0,
            "price-ceiling weight must be non-negative, got {}",
            wt_max.0
        );
        ensure!(
            wt_expected.0 + wt_max.0 > 0.0,
            "expected-mean and price-ceiling weights cannot both be zero"
        );
        ensure!(
            sold_threshold.0 > 0.0,
            "sold volume threshold must be positive, got {}",
            sold_threshold.0
        );

        let wt_realized = if (0.0..=1.0).contains(&wt_realized.0) {
            wt_realized
        } else {
            warn!(
                "realized price weight {} out of range, clamping to [0, 1]",
                wt_realized.0
            );
            Dimensionless(wt_realized.0.clamp(0.0, 1.0))
        };

        let sum = wt_expected + wt_max;
        Ok(Self {
            wt_expected,
            wt_max,
            wt_realized,
            sold_threshold,
            norm_wt_expected: wt_expected / sum,
            norm_wt_max: wt_max / sum,
        })
    }

    /// The weight on the claimed expected mean price
    pub fn wt_expected(&self) -> Dimensionless {
        self.wt_expected
    }

    /// The weight on the claimed price ceiling
    pub fn wt_max(&self) -> Dimensionless {
        self.wt_max
    }

    /// The maximum trust placed in the realized price
    pub fn wt_realized(&self) -> Dimensionless {
        self.wt_realized
    }

    /// The sold volume at which realized-price confidence reaches half its maximum weight
    pub fn sold_threshold(&self) -> Energy {
        self.sold_threshold
    }

    /// The normalized weight on the claimed expected mean price
    pub fn norm_wt_expected(&self) -> Dimensionless {
        self.norm_wt_expected
    }

    /// The normalized weight on the claimed price ceiling
    pub fn norm_wt_max(&self) -> Dimensionless {
        self.norm_wt_max
    }

    /// The blend factor between claimed prices and the realized price for a tariff that has sold
    /// `total_sold` of energy to date.
    ///
    /// With no price history the claimed parameters are trusted fully (`alpha == 1`); as sold
    /// volume grows, trust shifts towards the realized price, bounded by `wt_realized`.
    pub fn alpha(&self, total_sold: Energy) -> Dimensionless {
        Dimensionless(1.0)
            - self.wt_realized
                * (Dimensionless(1.0)
                    - Dimensionless(1.0)
                        / (Dimensionless(1.0) + total_sold / self.sold_threshold))
    }
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self::new(
            Dimensionless(DEFAULT_WT_EXPECTED),
            Dimensionless(DEFAULT_WT_MAX),
            Dimensionless(DEFAULT_WT_REALIZED),
            Energy(DEFAULT_SOLD_THRESHOLD),
        )
        .expect("default weights are valid")
    }
}

/// The per-call pricing context for one tariff evaluation.
///
/// A blend is built fresh at the start of every estimation call from the weights and a snapshot of
/// the tariff's sold volume and realized price. It is threaded through the projection loop and
/// handed to the tariff's charge lookup, which may invoke [`PriceBlend::weighted_value`] for each
/// of its variable rates. Nothing in the blend outlives the call that created it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBlend {
    /// Blend factor between claimed prices and the realized price
    pub alpha: Dimensionless,
    /// Normalized weight on the claimed expected mean price
    pub norm_wt_expected: Dimensionless,
    /// Normalized weight on the claimed price ceiling
    pub norm_wt_max: Dimensionless,
    /// The tariff's realized price at the time the blend was built
    pub realized_price: MoneyPerEnergy,
}

impl PriceBlend {
    /// Build the pricing context for evaluating `tariff` under `weights`
    pub fn for_tariff<T: Tariff + ?Sized>(weights: &EvaluationWeights, tariff: &T) -> Self {
        Self {
            alpha: weights.alpha(tariff.total_sold()),
            norm_wt_expected: weights.norm_wt_expected(),
            norm_wt_max: weights.norm_wt_max(),
            realized_price: tariff.realized_price(),
        }
    }

    /// Combine a rate's claimed price parameters with the tariff's realized price
    pub fn weighted_value(&self, rate: &Rate) -> MoneyPerEnergy {
        self.alpha
            * (self.norm_wt_expected * rate.expected_mean + self.norm_wt_max * rate.max_value)
            + (Dimensionless(1.0) - self.alpha) * self.realized_price
    }
}

/// Estimates what a customer would pay under a candidate tariff.
///
/// The intended pattern is one estimator per customer model, reused sequentially across the
/// tariffs that model evaluates. The estimator holds configuration only; each call builds its own
/// [`PriceBlend`], so calls never share mutable state.
#[derive(Debug, Clone)]
pub struct CostEstimator<C> {
    weights: EvaluationWeights,
    clock: C,
}

impl<C: Clock> CostEstimator<C> {
    /// Create an estimator from a set of weights and the simulation clock
    pub fn new(weights: EvaluationWeights, clock: C) -> Self {
        Self { weights, clock }
    }

    /// Replace all four weighting parameters at once, re-normalizing the claimed-price weights
    pub fn configure(
        &mut self,
        wt_expected: Dimensionless,
        wt_max: Dimensionless,
        wt_realized: Dimensionless,
        sold_threshold: Energy,
    ) -> Result<()> {
        self.weights = EvaluationWeights::new(wt_expected, wt_max, wt_realized, sold_threshold)?;
        Ok(())
    }

    /// The currently configured weights
    pub fn weights(&self) -> &EvaluationWeights {
        &self.weights
    }

    /// Estimate the total cost of buying the given hourly amounts of energy under `tariff`,
    /// starting one hour after the current simulation time.
    ///
    /// Covers usage charges and, when `include_periodic_charge` is set, the daily fixed payment
    /// spread evenly over 24 hourly periods. Signup and withdrawal payments are not covered. The
    /// projected usage is assumed to be a single customer's, since the daily tier counter is
    /// per-customer.
    pub fn estimate_cost<T: Tariff + ?Sized>(
        &self,
        tariff: &T,
        usage: &[Energy],
        include_periodic_charge: bool,
    ) -> Money {
        self.estimate_cost_array(tariff, usage, include_periodic_charge)
            .into_iter()
            .sum()
    }

    /// Estimate cost per projected hour, in the same shape as the usage slice.
    ///
    /// Each element is the charge for the corresponding usage element; see
    /// [`CostEstimator::estimate_cost`] for what the charges cover.
    pub fn estimate_cost_array<T: Tariff + ?Sized>(
        &self,
        tariff: &T,
        usage: &[Energy],
        include_periodic_charge: bool,
    ) -> Vec<Money> {
        let blend = PriceBlend::for_tariff(&self.weights, tariff);
        let hourly_periodic = tariff.periodic_payment() / Dimensionless(24.0);
        let mut daily_usage = Energy(0.0);
        let mut time = self.clock.now();

        usage
            .iter()
            .map(|&hourly| {
                time += chrono::Duration::hours(1);
                let mut charge = tariff.usage_charge(time, hourly, daily_usage, &blend);
                if include_periodic_charge {
                    charge += hourly_periodic;
                }
                // The day boundary follows the simulation clock's current hour, which does not
                // advance over the projection.
                if self.clock.hour_of_day() == 0 {
                    daily_usage = Energy(0.0);
                } else {
                    daily_usage += hourly;
                }
                charge
            })
            .collect_vec()
    }

    /// Aggregate estimated cost, including periodic charges
    pub fn estimate_total_cost<T: Tariff + ?Sized>(&self, tariff: &T, usage: &[Energy]) -> Money {
        self.estimate_cost(tariff, usage, true)
    }

    /// Per-hour estimated costs, including periodic charges
    pub fn estimate_hourly_costs<T: Tariff + ?Sized>(
        &self,
        tariff: &T,
        usage: &[Energy],
    ) -> Vec<Money> {
        self.estimate_cost_array(tariff, usage, true)
    }
}
