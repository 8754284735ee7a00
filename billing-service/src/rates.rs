//! Department rate policy for discharge billing.

use crate::models::Department;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Flat fee added to every discharge bill
pub const BASE_FEE: Decimal = dec!(500);

/// Daily rate for any department without an explicit entry
pub const DEFAULT_DAILY_RATE: Decimal = dec!(1000);

/// Department -> daily rate lookup with a documented fallback.
///
/// Lookups never fail: unknown departments are billed at the default rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base_fee: Decimal,
    default_rate: Decimal,
    rates: HashMap<Department, Decimal>,
}

impl RateTable {
    /// Empty table billing every department at `default_rate`
    pub fn new(base_fee: Decimal, default_rate: Decimal) -> Self {
        Self {
            base_fee,
            default_rate,
            rates: HashMap::new(),
        }
    }

    /// The hospital's fixed tariff
    pub fn standard() -> Self {
        Self::new(BASE_FEE, DEFAULT_DAILY_RATE)
            .with_rate(Department::Cardiology, dec!(1500))
            .with_rate(Department::Neurology, dec!(1800))
            .with_rate(Department::Oncology, dec!(2000))
            .with_rate(Department::Emergency, dec!(1200))
    }

    pub fn with_rate(mut self, department: Department, daily_rate: Decimal) -> Self {
        self.rates.insert(department, daily_rate);
        self
    }

    pub fn daily_rate(&self, department: &Department) -> Decimal {
        self.rates
            .get(department)
            .copied()
            .unwrap_or(self.default_rate)
    }

    pub fn base_fee(&self) -> Decimal {
        self.base_fee
    }

    pub fn default_rate(&self) -> Decimal {
        self.default_rate
    }

    /// Explicit entries ordered by department name
    pub fn entries(&self) -> Vec<(&Department, Decimal)> {
        let mut entries: Vec<_> = self.rates.iter().map(|(d, r)| (d, *r)).collect();
        entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        entries
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}
