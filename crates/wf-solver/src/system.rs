//! Algebraic system abstraction and the square-system driver.

use nalgebra::DVector;
use wf_core::Real;

use crate::error::{SolverError, SolverResult};
use crate::jacobian::{JacobianMethod, central_difference_jacobian, finite_difference_jacobian};
use crate::newton::{NewtonConfig, NewtonOutcome, newton_solve};

/// A set of residual equations over a vector of free variables.
///
/// Implementors expose the current free-variable values as the start point
/// and evaluate residuals at arbitrary points. `residuals` must be a pure
/// function of `x` (no interior mutation) so the finite difference Jacobian
/// can evaluate columns in parallel.
pub trait AlgebraicSystem: Sync {
    /// Number of free variables.
    fn dimension(&self) -> usize;

    /// Number of residual equations.
    fn residual_count(&self) -> usize;

    /// Current free-variable values, used as the solver start point.
    fn initial_guess(&self) -> DVector<Real>;

    /// Evaluate all residuals at `x`.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Free variables minus residual equations. Zero means exactly
    /// determined.
    fn degrees_of_freedom(&self) -> i64 {
        self.dimension() as i64 - self.residual_count() as i64
    }
}

/// Solve an exactly determined system with the damped Newton iteration and
/// a finite difference Jacobian.
///
/// Errors only on structural problems; whether the iteration converged is
/// reported inside the outcome.
pub fn solve_square<S>(system: &S, config: &NewtonConfig) -> SolverResult<NewtonOutcome>
where
    S: AlgebraicSystem + ?Sized,
{
    let n = system.dimension();
    let m = system.residual_count();
    if n != m {
        return Err(SolverError::NotSquare {
            variables: n,
            residuals: m,
        });
    }
    let x0 = system.initial_guess();
    if x0.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!("initial guess has {} entries for {n} free variables", x0.len()),
        });
    }

    let residual = |x: &DVector<Real>| system.residuals(x);
    let jacobian = |x: &DVector<Real>| {
        let f = |x: &DVector<Real>| system.residuals(x);
        match config.jacobian_method {
            JacobianMethod::Forward => finite_difference_jacobian(x, f, config.fd_epsilon),
            JacobianMethod::Central => central_difference_jacobian(x, f, config.fd_epsilon),
        }
    };
    Ok(newton_solve(x0, residual, jacobian, config))
}
