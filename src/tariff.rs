//! The tariff-side interface consumed by the cost estimator.
//!
//! Tariffs and their rate structures are owned elsewhere in the simulation; the estimator only
//! needs the narrow read surface defined here. A tariff's charge lookup receives the estimator's
//! [`PriceBlend`] so that rate structures with several variable components can combine their
//! claimed prices through the same risk-adjusted blend.
use crate::estimator::PriceBlend;
use crate::units::{Energy, Money, MoneyPerEnergy};
use chrono::{DateTime, Utc};

/// A single variable pricing rule within a tariff.
///
/// A rate carries the offering broker's claimed price parameters: the expected mean price a
/// customer will pay under the rule, and the ceiling the broker commits never to exceed. Which
/// rate applies at a given time or usage tier is the tariff's own business.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate {
    /// The broker's claimed expected mean price
    pub expected_mean: MoneyPerEnergy,
    /// The broker's committed price ceiling
    pub max_value: MoneyPerEnergy,
}

impl Rate {
    /// Create a rate from its claimed price parameters
    pub fn new(expected_mean: MoneyPerEnergy, max_value: MoneyPerEnergy) -> Self {
        Self {
            expected_mean,
            max_value,
        }
    }
}

/// The read surface of a priced tariff offering.
///
/// All values are snapshots: the estimator reads them once per estimation call and does not track
/// changes mid-projection.
pub trait Tariff {
    /// The charge for consuming `usage` during the hour ending at `at`.
    ///
    /// `daily_usage` is the cumulative consumption recorded so far in the current day, which
    /// tier-dependent rate structures use to select the applicable rate. Implementations may call
    /// [`PriceBlend::weighted_value`] to price their variable rates.
    fn usage_charge(
        &self,
        at: DateTime<Utc>,
        usage: Energy,
        daily_usage: Energy,
        blend: &PriceBlend,
    ) -> Money;

    /// Total energy volume sold under this tariff to date
    fn total_sold(&self) -> Energy;

    /// The average price actually paid under this tariff to date
    fn realized_price(&self) -> MoneyPerEnergy;

    /// The fixed daily payment, independent of usage
    fn periodic_payment(&self) -> Money;
}
