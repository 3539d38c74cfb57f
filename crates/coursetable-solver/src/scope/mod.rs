//! Scopes shared by the phases of one sub-problem.

mod phase;
mod solver;

pub use phase::PhaseScope;
pub use solver::SolverScope;
