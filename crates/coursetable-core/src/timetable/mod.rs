//! Weekly timetable grid.

mod grid;
mod position;
mod transaction;


pub use grid::TimeTable;
pub use position::Position;
pub use transaction::Transaction;
