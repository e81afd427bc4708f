//! Timephased work and cost.
//!
//! Assignments store timephased data as blocks of cumulative amounts. The
//! [`TimephasedDataFactory`] turns those blocks into raw spans; the
//! normalisers turn raw spans into a canonical sequence in which every span
//! lies within one day, except runs of identical daily amounts merged into
//! one span.

pub mod cost_normaliser;
pub mod factory;
pub mod split;
pub mod work_normaliser;

use mpp_model::{Duration, Timephased, WorkingTime};

pub use cost_normaliser::CostNormaliser;
pub use factory::TimephasedDataFactory;
pub use work_normaliser::WorkNormaliser;

/// Quantity carried by a timephased span.
pub trait Amount: Copy {
    fn value(&self) -> f64;

    /// The same kind of quantity with a different magnitude.
    #[must_use]
    fn with_value(self, value: f64) -> Self;
}

impl Amount for Duration {
    fn value(&self) -> f64 {
        self.value
    }

    fn with_value(self, value: f64) -> Self {
        Duration::new(value, self.units)
    }
}

impl Amount for f64 {
    fn value(&self) -> f64 {
        *self
    }

    fn with_value(self, value: f64) -> Self {
        value
    }
}

/// A timephased normalisation pipeline.
pub trait Normaliser {
    type Amount: Amount;

    fn normalise<C: WorkingTime + ?Sized>(
        &self,
        calendar: &C,
        spans: Vec<Timephased<Self::Amount>>,
    ) -> Vec<Timephased<Self::Amount>>;
}
