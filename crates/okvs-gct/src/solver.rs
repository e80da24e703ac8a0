//! Dense Gaussian elimination over a generic finite field.
//!
//! The encoder needs two flavors of the same elimination: [`full_solve`]
//! assigns fresh random elements to free variables, which the
//! doubly-oblivious encoding relies on, while [`free_solve`] assigns zero.
//! Both reduce the system in place and report whether it is consistent.

use okvs_core::fields::Field;
use rand::{CryptoRng, Rng};

/// Outcome of Gaussian elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemInfo {
    /// The system has a solution, now stored in `x`.
    Consistent,
    /// The system has no solution.
    Inconsistent,
}

/// Solves `lhs * x = rhs`, assigning fresh random elements to free
/// variables.
///
/// `lhs` and `rhs` are reduced in place; `x` must have one slot per column.
pub fn full_solve<F: Field, R: Rng + CryptoRng>(
    lhs: &mut [Vec<F>],
    rhs: &mut [F],
    x: &mut [F],
    rng: &mut R,
) -> SystemInfo {
    solve(lhs, rhs, x, || F::rand(rng))
}

/// Solves `lhs * x = rhs`, assigning zero to free variables.
pub fn free_solve<F: Field>(lhs: &mut [Vec<F>], rhs: &mut [F], x: &mut [F]) -> SystemInfo {
    solve(lhs, rhs, x, F::zero)
}

fn solve<F: Field>(
    lhs: &mut [Vec<F>],
    rhs: &mut [F],
    x: &mut [F],
    mut free_value: impl FnMut() -> F,
) -> SystemInfo {
    debug_assert_eq!(lhs.len(), rhs.len());
    let num_rows = lhs.len();
    let num_columns = x.len();

    // forward elimination, scaling every pivot row to a leading one
    let mut pivots: Vec<(usize, usize)> = Vec::with_capacity(num_rows);
    let mut row = 0;
    for column in 0..num_columns {
        if row == num_rows {
            break;
        }
        let Some(pivot) = (row..num_rows).find(|&r| !lhs[r][column].is_zero()) else {
            // free column
            continue;
        };
        lhs.swap(row, pivot);
        rhs.swap(row, pivot);

        let inverse = lhs[row][column].inverse();
        for entry in &mut lhs[row][column..] {
            *entry = inverse * *entry;
        }
        rhs[row] = inverse * rhs[row];

        let pivot_row = lhs[row].clone();
        let pivot_rhs = rhs[row];
        for r in row + 1..num_rows {
            let factor = lhs[r][column];
            if factor.is_zero() {
                continue;
            }
            for (entry, &pivot_entry) in lhs[r][column..].iter_mut().zip(&pivot_row[column..]) {
                *entry = *entry - factor * pivot_entry;
            }
            rhs[r] = rhs[r] - factor * pivot_rhs;
        }

        pivots.push((row, column));
        row += 1;
    }

    // rows eliminated to zero must have a zero right-hand side
    for r in row..num_rows {
        if !rhs[r].is_zero() {
            return SystemInfo::Inconsistent;
        }
    }

    // assign free columns, then back-substitute the pivots in reverse
    let mut is_pivot = vec![false; num_columns];
    for &(_, column) in &pivots {
        is_pivot[column] = true;
    }
    for (column, slot) in x.iter_mut().enumerate() {
        if !is_pivot[column] {
            *slot = free_value();
        }
    }
    for &(r, column) in pivots.iter().rev() {
        let mut acc = rhs[r];
        for (j, coeff) in lhs[r].iter().enumerate().skip(column + 1) {
            if !coeff.is_zero() {
                acc = acc - *coeff * x[j];
            }
        }
        x[column] = acc;
    }

    SystemInfo::Consistent
}
