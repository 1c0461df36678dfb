//! End-to-end tariff comparison through the public API.
use chrono::{DateTime, TimeZone, Timelike, Utc};
use float_cmp::assert_approx_eq;
use std::rc::Rc;
use tariff_eval::clock::FixedClock;
use tariff_eval::estimator::{CostEstimator, PriceBlend};
use tariff_eval::settings::Settings;
use tariff_eval::tariff::{Rate, Tariff};
use tariff_eval::units::{Energy, Money, MoneyPerEnergy};

/// A tariff with separate day and night variable rates, priced through the estimator's blend
struct TimeOfUseTariff {
    day: Rate,
    night: Rate,
    /// Hour of day at which the day rate starts applying
    day_start: u32,
    /// Hour of day at which the night rate takes over again
    day_end: u32,
    realized_price: MoneyPerEnergy,
    total_sold: Energy,
    periodic_payment: Money,
}

impl Tariff for TimeOfUseTariff {
    fn usage_charge(
        &self,
        at: DateTime<Utc>,
        usage: Energy,
        _daily_usage: Energy,
        blend: &PriceBlend,
    ) -> Money {
        let rate = if (self.day_start..self.day_end).contains(&at.hour()) {
            &self.day
        } else {
            &self.night
        };
        blend.weighted_value(rate) * usage
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

fn time_of_use_tariff() -> TimeOfUseTariff {
    TimeOfUseTariff {
        day: Rate::new(MoneyPerEnergy(0.15), MoneyPerEnergy(0.25)),
        night: Rate::new(MoneyPerEnergy(0.08), MoneyPerEnergy(0.12)),
        day_start: 7,
        day_end: 21,
        realized_price: MoneyPerEnergy(0.13),
        total_sold: Energy(50000.0),
        periodic_payment: Money(1.2),
    }
}

/// An estimator configured from default settings, with the simulation clock at 10:00
fn estimator() -> CostEstimator<Rc<FixedClock>> {
    let weights = Settings::default().evaluation.to_weights().unwrap();
    let clock = Rc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2030, 6, 1, 10, 0, 0).unwrap(),
    ));
    CostEstimator::new(weights, clock)
}

#[test]
fn test_day_long_projection_against_hand_computed_total() {
    // With 50000 sold against a threshold of 10000, alpha = 1 - 0.8 * (1 - 1/6) = 1/3. The day
    // rate then blends to 1/3 * (0.6*0.15 + 0.4*0.25) + 2/3 * 0.13 = 0.15 per unit, the night
    // rate to 0.1186667. Starting at 11:00, a 24-hour projection covers 14 day hours (11-20 and
    // 7-10 next morning) and 10 night hours, plus the 1.2 daily payment.
    let estimator = estimator();
    let usage = [Energy(1.0); 24];
    let total = estimator.estimate_total_cost(&time_of_use_tariff(), &usage);
    let night_value = (0.6 * 0.08 + 0.4 * 0.12) / 3.0 + 2.0 / 3.0 * 0.13;
    assert_approx_eq!(
        f64,
        total.value(),
        14.0 * 0.15 + 10.0 * night_value + 1.2,
        epsilon = 1e-9
    );
}

#[test]
fn test_scalar_matches_hourly_breakdown() {
    let estimator = estimator();
    let tariff = time_of_use_tariff();
    let usage: Vec<_> = (0..48).map(|hour| Energy(0.5 + 0.1 * (hour % 5) as f64)).collect();

    let hourly = estimator.estimate_hourly_costs(&tariff, &usage);
    assert_eq!(hourly.len(), usage.len());
    assert_approx_eq!(
        f64,
        estimator.estimate_total_cost(&tariff, &usage).value(),
        hourly.into_iter().sum::<Money>().value(),
        epsilon = 1e-9
    );
}

#[test]
fn test_estimator_ranks_competing_offers() {
    // A freshly launched flat tariff with no sales history is priced entirely off its claims,
    // which undercut the established time-of-use offer for a night-heavy usage profile.
    struct FlatOffer;

    impl Tariff for FlatOffer {
        fn usage_charge(
            &self,
            _at: DateTime<Utc>,
            usage: Energy,
            _daily_usage: Energy,
            blend: &PriceBlend,
        ) -> Money {
            blend.weighted_value(&Rate::new(MoneyPerEnergy(0.09), MoneyPerEnergy(0.14))) * usage
        }

        fn total_sold(&self) -> Energy {
            Energy(0.0)
        }

        fn realized_price(&self) -> MoneyPerEnergy {
            MoneyPerEnergy(0.0)
        }

        fn periodic_payment(&self) -> Money {
            Money(1.2)
        }
    }

    let estimator = estimator();
    let usage = [Energy(1.5); 24];
    let time_of_use = estimator.estimate_total_cost(&time_of_use_tariff(), &usage);
    let flat = estimator.estimate_total_cost(&FlatOffer, &usage);
    assert!(flat < time_of_use);
}
