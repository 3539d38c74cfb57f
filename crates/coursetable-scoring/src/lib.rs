//! Coursetable Scoring - constraint evaluation
//!
//! - [`hard`] - time and room feasibility of placing an event
//! - [`soft`] - soft penalties and the total cost of a grid

pub mod hard;
pub mod soft;

pub use hard::{curricula_occupied, fits, fits_position, fitting_slots, lecturers_occupied, room_capacity};
pub use soft::{evaluate, total_cost, CostBreakdown};
