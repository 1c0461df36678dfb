//! Fixtures for tests

use crate::clock::FixedClock;
use crate::estimator::{EvaluationWeights, PriceBlend};
use crate::tariff::Tariff;
use crate::units::{Energy, Money, MoneyPerEnergy};
use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// A tariff charging a flat price per unit of energy
pub struct FlatTariff {
    pub price: MoneyPerEnergy,
    pub realized_price: MoneyPerEnergy,
    pub total_sold: Energy,
    pub periodic_payment: Money,
}

impl Tariff for FlatTariff {
    fn usage_charge(
        &self,
        _at: DateTime<Utc>,
        usage: Energy,
        _daily_usage: Energy,
        _blend: &PriceBlend,
    ) -> Money {
        self.price * usage
    }

    fn total_sold(&self) -> Energy {
        self.total_sold
    }

    fn realized_price(&self) -> MoneyPerEnergy {
        self.realized_price
    }

    fn periodic_payment(&self) -> Money {
        self.periodic_payment
    }
}

/// A tariff whose price steps up once cumulative daily usage crosses a tier threshold
pub struct TieredTariff {
    pub below: MoneyPerEnergy,
    pub above: MoneyPerEnergy,
    pub tier_threshold: Energy,
    pub realized_price: MoneyPerEnergy,
    pub total_sold: Energy,
    pub periodic_payment: Money,
}

impl Tariff for TieredTariff {
    fn usage_charge(
        &self,
        _at: DateTime<Utc>,
        usage: Energy,
        daily_usage: Energy,
        _blend: &PriceBlend,
    ) -> Money {
        let price = if daily_usage < self.tier_threshold {
            self.below
        } else {
            self.above
        };
        price * usage
    }

    fn total_sold(&self) -> Energy {
        self.total_sold
    }

    fn realized_price(&self) -> MoneyPerEnergy {
        self.realized_price
    }

    fn periodic_payment(&self) -> Money {
        self.periodic_payment
    }
}

#[fixture]
pub fn weights() -> EvaluationWeights {
    EvaluationWeights::default()
}

#[fixture]
pub fn noon_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap())
}

#[fixture]
pub fn midnight_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap())
}

#[fixture]
pub fn flat_tariff() -> FlatTariff {
    FlatTariff {
        price: MoneyPerEnergy(1.0),
        realized_price: MoneyPerEnergy(1.0),
        total_sold: Energy(0.0),
        periodic_payment: Money(240.0),
    }
}

#[fixture]
pub fn tiered_tariff() -> TieredTariff {
    TieredTariff {
        below: MoneyPerEnergy(0.1),
        above: MoneyPerEnergy(0.5),
        tier_threshold: Energy(5.0),
        realized_price: MoneyPerEnergy(0.12),
        total_sold: Energy(20000.0),
        periodic_payment: Money(2.4),
    }
}
