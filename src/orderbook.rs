//! An in-memory repository of wholesale market clearing records.
//!
//! Customer and broker models read recent clearing prices when judging tariff offers against the
//! wholesale market. Orderbooks are created with [`OrderbookRepo::make_orderbook`] and queried by
//! timeslot; the repository separately tracks the most recent orderbook per timeslot and the most
//! recent one that actually cleared with a price.
use crate::units::MoneyPerEnergy;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::debug;
use std::rc::Rc;

/// A market timeslot, identified by its serial number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("ts{_0}")]
pub struct Timeslot(pub u32);

/// The outcome of one market clearing for one timeslot
#[derive(Debug, Clone, PartialEq)]
pub struct Orderbook {
    /// The timeslot the orderbook trades energy for
    pub timeslot: Timeslot,
    /// The clearing price, or `None` if the market did not clear
    pub clearing_price: Option<MoneyPerEnergy>,
    /// When the clearing was executed
    pub date_executed: DateTime<Utc>,
}

/// Repository of [`Orderbook`]s indexed by timeslot.
#[derive(Debug, Default)]
pub struct OrderbookRepo {
    /// Every orderbook created for each timeslot, in creation order
    orderbooks: IndexMap<Timeslot, Vec<Rc<Orderbook>>>,
    /// The most recent orderbook for each timeslot
    latest: IndexMap<Timeslot, Rc<Orderbook>>,
    /// The most recent orderbook with a non-empty clearing price for each timeslot
    spot: IndexMap<Timeslot, Rc<Orderbook>>,
    min_ask_prices: Option<Vec<MoneyPerEnergy>>,
    max_ask_prices: Option<Vec<MoneyPerEnergy>>,
}

impl OrderbookRepo {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new orderbook for `timeslot`, executed at `executed_at`.
    ///
    /// The record becomes the most recent orderbook for its timeslot, and the most recent cleared
    /// one when `clearing_price` is present.
    pub fn make_orderbook(
        &mut self,
        timeslot: Timeslot,
        clearing_price: Option<MoneyPerEnergy>,
        executed_at: DateTime<Utc>,
    ) -> Rc<Orderbook> {
        let orderbook = Rc::new(Orderbook {
            timeslot,
            clearing_price,
            date_executed: executed_at,
        });
        self.latest.insert(timeslot, Rc::clone(&orderbook));
        if clearing_price.is_some() {
            self.spot.insert(timeslot, Rc::clone(&orderbook));
        }
        self.orderbooks
            .entry(timeslot)
            .or_default()
            .push(Rc::clone(&orderbook));
        debug!(
            "Created new orderbook for {timeslot}, clearing price {clearing_price:?}"
        );
        orderbook
    }

    /// The most recent orderbook created for `timeslot`
    pub fn find_by_timeslot(&self, timeslot: Timeslot) -> Option<&Rc<Orderbook>> {
        self.latest.get(&timeslot)
    }

    /// The most recent orderbook for `timeslot` with a non-empty clearing price.
    ///
    /// Returns `None` if the timeslot has never cleared.
    pub fn find_spot_by_timeslot(&self, timeslot: Timeslot) -> Option<&Rc<Orderbook>> {
        self.spot.get(&timeslot)
    }

    /// Every orderbook created for `timeslot`, oldest first
    pub fn find_all_by_timeslot(&self, timeslot: Timeslot) -> &[Rc<Orderbook>] {
        self.orderbooks
            .get(&timeslot)
            .map_or(&[], Vec::as_slice)
    }

    /// Record the minimum ask prices from the most recent market clearing
    pub fn set_min_ask_prices(&mut self, values: Vec<MoneyPerEnergy>) {
        self.min_ask_prices = Some(values);
    }

    /// Record the maximum ask prices from the most recent market clearing
    pub fn set_max_ask_prices(&mut self, values: Vec<MoneyPerEnergy>) {
        self.max_ask_prices = Some(values);
    }

    /// The minimum ask prices from the most recent market clearing, if recorded
    pub fn min_ask_prices(&self) -> Option<&[MoneyPerEnergy]> {
        self.min_ask_prices.as_deref()
    }

    /// The maximum ask prices from the most recent market clearing, if recorded
    pub fn max_ask_prices(&self) -> Option<&[MoneyPerEnergy]> {
        self.max_ask_prices.as_deref()
    }

    /// The number of timeslots with at least one orderbook
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// Whether the repository holds no orderbooks
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Clear all indices in preparation for a new simulation
    pub fn recycle(&mut self) {
        self.orderbooks.clear();
        self.latest.clear();
        self.spot.clear();
        self.min_ask_prices = None;
        self.max_ask_prices = None;
    }
}
