//! wf-solver: dense Newton solver for equation-oriented process models.
//!
//! Unit models expose their equations as an [`AlgebraicSystem`] over the
//! free (unfixed) state variables; [`solve_square`] drives a damped Newton
//! iteration with a finite difference Jacobian over it. Convergence failure
//! is reported as a [`TerminationCondition`], not an error, so callers can
//! unwind state holds cleanly and surface the condition to users.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod system;

pub use error::{SolverError, SolverResult};
pub use jacobian::{JacobianMethod, central_difference_jacobian, finite_difference_jacobian};
pub use newton::{NewtonConfig, NewtonOutcome, NewtonStatus, TerminationCondition, newton_solve};
pub use system::{AlgebraicSystem, solve_square};
