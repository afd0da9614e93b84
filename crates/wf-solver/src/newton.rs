//! Damped Newton iteration for dense nonlinear systems.

use nalgebra::{DMatrix, DVector};
use tracing::debug;
use wf_core::Real;

use crate::jacobian::JacobianMethod;

/// Newton solver configuration.
#[derive(Debug, Clone)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: Real,
    /// Relative tolerance for residual norm
    pub rel_tol: Real,
    /// Line search backtracking factor
    pub line_search_beta: Real,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Finite difference scheme used when no analytic Jacobian exists
    pub jacobian_method: JacobianMethod,
    /// Relative perturbation for finite differences
    pub fd_epsilon: Real,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-8,
            rel_tol: 1e-8,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            jacobian_method: JacobianMethod::Forward,
            fd_epsilon: 1e-7,
        }
    }
}

/// How a Newton run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonStatus {
    /// Residual norm met the absolute or relative tolerance.
    Converged,
    /// Iteration budget exhausted before the tolerance was met.
    IterationLimit,
    /// Line search could not reduce the residual any further.
    Stalled,
    /// The Jacobian factorisation produced no usable step.
    SingularJacobian,
}

/// Classification of how a solve ended, independent of the algorithm.
///
/// Callers branch on this the way they would on an optimiser's exit code:
/// anything other than `Optimal` means the result values are suspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCondition {
    Optimal,
    IterationLimit,
    Stalled,
    NumericalFailure,
}

impl TerminationCondition {
    pub fn is_optimal(self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl From<NewtonStatus> for TerminationCondition {
    fn from(status: NewtonStatus) -> Self {
        match status {
            NewtonStatus::Converged => Self::Optimal,
            NewtonStatus::IterationLimit => Self::IterationLimit,
            NewtonStatus::Stalled => Self::Stalled,
            NewtonStatus::SingularJacobian => Self::NumericalFailure,
        }
    }
}

impl std::fmt::Display for TerminationCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::IterationLimit => "iteration_limit",
            Self::Stalled => "stalled",
            Self::NumericalFailure => "numerical_failure",
        };
        f.write_str(s)
    }
}

/// Result of a Newton run. Non-convergence is data, not an error.
#[derive(Debug, Clone)]
pub struct NewtonOutcome {
    pub status: NewtonStatus,
    /// Best iterate reached.
    pub x: DVector<Real>,
    /// Residual norm at `x`.
    pub residual_norm: Real,
    pub iterations: usize,
}

impl NewtonOutcome {
    pub fn converged(&self) -> bool {
        self.status == NewtonStatus::Converged
    }

    pub fn condition(&self) -> TerminationCondition {
        self.status.into()
    }
}

/// Newton iteration with a backtracking line search.
///
/// Each step solves `J * dx = -r` by LU factorisation, then backtracks the
/// step length until the residual norm decreases. A zero-dimension system
/// converges immediately.
pub fn newton_solve<F, J>(
    x0: DVector<Real>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> NewtonOutcome
where
    F: Fn(&DVector<Real>) -> DVector<Real>,
    J: Fn(&DVector<Real>) -> DMatrix<Real>,
{
    let mut x = x0;
    let mut r = residual_fn(&x);
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..=config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            debug!(iterations = iter, residual = r_norm, "newton converged");
            return NewtonOutcome {
                status: NewtonStatus::Converged,
                x,
                residual_norm: r_norm,
                iterations: iter,
            };
        }
        if iter == config.max_iterations {
            break;
        }

        let jac = jacobian_fn(&x);
        let Some(dx) = jac.lu().solve(&(-r.clone())) else {
            return NewtonOutcome {
                status: NewtonStatus::SingularJacobian,
                x,
                residual_norm: r_norm,
                iterations: iter,
            };
        };

        // Backtracking line search on the residual norm.
        let mut alpha = 1.0;
        let mut x_new = &x + alpha * &dx;
        let mut r_new = residual_fn(&x_new);
        let mut r_new_norm = r_new.norm();
        for _ in 0..config.max_line_search_iters {
            if r_new_norm < r_norm {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new);
            r_new_norm = r_new.norm();
        }
        if r_new_norm >= r_norm {
            return NewtonOutcome {
                status: NewtonStatus::Stalled,
                x,
                residual_norm: r_norm,
                iterations: iter,
            };
        }

        debug!(iteration = iter, residual = r_new_norm, step = alpha, "newton step");
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    NewtonOutcome {
        status: NewtonStatus::IterationLimit,
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
    }
}
