//! Neighborhood moves and their bookkeeping.
//!
//! - [`neighborhood`] - random position draws, swaps and greedy refills
//! - [`tabu`] - bounded FIFO tabu lists
//! - [`cooling`] - annealing temperature schedules

pub mod cooling;
pub mod neighborhood;
pub mod tabu;

pub use cooling::{ExponentialCooling, TemperatureSchedule};
pub use neighborhood::SwapMode;
pub use tabu::TabuList;
