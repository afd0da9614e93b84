//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use wf_core::Real;

/// Finite difference scheme for Jacobian columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JacobianMethod {
    /// One extra residual evaluation per column.
    Forward,
    /// Two evaluations per column, second-order accurate.
    Central,
}

/// Compute a dense Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by a step scaled to the variable
/// magnitude and computes (f(x+e) - f(x))/e. Columns are evaluated in
/// parallel, so `f` must be a pure function of its argument.
pub fn finite_difference_jacobian<F>(x: &DVector<Real>, f: F, epsilon: Real) -> DMatrix<Real>
where
    F: Fn(&DVector<Real>) -> DVector<Real> + Sync,
{
    let n = x.len();
    let f_x = f(x);
    let m = f_x.len();

    let columns: Vec<DVector<Real>> = (0..n)
        .into_par_iter()
        .map(|j| {
            let mut x_perturbed = x.clone();
            let dx = epsilon * x[j].abs().max(1.0);
            x_perturbed[j] += dx;
            (f(&x_perturbed) - &f_x) / dx
        })
        .collect();

    let mut jac = DMatrix::zeros(m, n);
    for (j, col) in columns.iter().enumerate() {
        jac.set_column(j, col);
    }
    jac
}

/// Compute a dense Jacobian using central finite differences (more accurate
/// but twice the cost).
pub fn central_difference_jacobian<F>(x: &DVector<Real>, f: F, epsilon: Real) -> DMatrix<Real>
where
    F: Fn(&DVector<Real>) -> DVector<Real> + Sync,
{
    let n = x.len();
    let m = f(x).len();

    let columns: Vec<DVector<Real>> = (0..n)
        .into_par_iter()
        .map(|j| {
            let dx = epsilon * x[j].abs().max(1.0);

            let mut x_plus = x.clone();
            x_plus[j] += dx;
            let f_plus = f(&x_plus);

            let mut x_minus = x.clone();
            x_minus[j] -= dx;
            let f_minus = f(&x_minus);

            (f_plus - f_minus) / (2.0 * dx)
        })
        .collect();

    let mut jac = DMatrix::zeros(m, n);
    for (j, col) in columns.iter().enumerate() {
        jac.set_column(j, col);
    }
    jac
}
