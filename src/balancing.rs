//! Balancing-capacity offers from brokers to the distribution utility.
use crate::id::define_id_type;
use crate::units::{Dimensionless, MoneyPerEnergy};

define_id_type! {BrokerID}
define_id_type! {TariffID}

/// An offer of balancing capacity from a broker to the distribution utility.
///
/// The broker offers a proportion of the curtailable capacity remaining under one of its tariffs
/// for balancing purposes, at a price per unit of curtailed energy. Once submitted, an order
/// remains in effect until replaced with another order for the same tariff.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingOrder {
    /// The broker issuing the order
    pub broker: BrokerID,
    /// The tariff whose curtailable capacity is offered
    pub tariff: TariffID,
    /// Maximum ratio of curtailable usage on the tariff that can be curtailed for balancing
    pub exercise_ratio: Dimensionless,
    /// Price per unit energy for exercising this order; positive values credit the broker
    pub price: MoneyPerEnergy,
}

impl BalancingOrder {
    /// Create a balancing order
    pub fn new(
        broker: BrokerID,
        tariff: TariffID,
        exercise_ratio: Dimensionless,
        price: MoneyPerEnergy,
    ) -> Self {
        Self {
            broker,
            tariff,
            exercise_ratio,
            price,
        }
    }

    /// Valid if the exercise ratio is between 0 and 1
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.exercise_ratio.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, true)]
    #[case(0.5, true)]
    #[case(1.0, true)]
    #[case(-0.1, false)]
    #[case(1.1, false)]
    fn test_is_valid(#[case] exercise_ratio: f64, #[case] expected: bool) {
        let order = BalancingOrder::new(
            "broker1".into(),
            "tariff1".into(),
            Dimensionless(exercise_ratio),
            MoneyPerEnergy(0.05),
        );
        assert_eq!(order.is_valid(), expected);
    }
}
