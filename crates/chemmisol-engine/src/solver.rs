//! Newton solver for the mass balance equations
//!
//! Unknowns are the natural logarithms of the free component activities.
//! Solvent and fixed components are constants. For every free component `j`
//! the residual is
//!
//! ```text
//! F_j = s_j a_j + Σ_p ν_pj s_p a_p - s_j T_j
//! ```
//!
//! where `s` converts mineral fractions to mol/l (`sites_quantity`) and is 1
//! for aqueous species.

use std::f64::consts::LN_10;

use tracing::{debug, warn};

use crate::phase::Phase;
use crate::system::{activity, Component, ProducedSpecies};

/// Iteration bound applied when none is configured
pub const DEFAULT_MAX_ITERATION: usize = 1000;

/// Relative residual under which the system is considered solved
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Starting activity of a free component without any positive estimate
const FALLBACK_GUESS: f64 = 1e-6;

/// Largest change of a log activity in a single step
const MAX_STEP: f64 = 5.0;

/// Solver parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Iteration bound
    pub max_iterations: usize,
    /// Relative residual tolerance
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATION,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Newton iterations performed
    pub iterations: usize,
    /// Whether the residual dropped under the tolerance
    pub converged: bool,
    /// Largest relative residual of the last evaluation
    pub residual: f64,
}

struct Scales {
    sites_quantity: f64,
}

impl Scales {
    fn of(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Mineral => self.sites_quantity,
            Phase::Solvent | Phase::Aqueous => 1.0,
        }
    }
}

pub(crate) fn solve(
    components: &mut [Component],
    produced: &mut [ProducedSpecies],
    sites_quantity: f64,
    options: &SolverOptions,
) -> SolveReport {
    let scales = Scales { sites_quantity };

    // Free components that no produced species involves have a trivial
    // solution and would make the Jacobian singular.
    let mut unknowns: Vec<usize> = Vec::new();
    for (index, component) in components.iter_mut().enumerate() {
        if component.fixed || component.phase == Phase::Solvent {
            continue;
        }
        let involved = produced
            .iter()
            .any(|p| p.stoichiometry.iter().any(|&(j, nu)| j == index && nu != 0.0));
        if involved {
            unknowns.push(index);
        } else {
            component.concentration = component.total_concentration.max(0.0);
        }
    }

    let mut log_activities: Vec<f64> = components
        .iter()
        .map(|c| activity(c.phase, c.concentration).ln())
        .collect();
    for &index in &unknowns {
        let component = &components[index];
        let guess = if component.concentration > 0.0 {
            component.concentration
        } else if component.total_concentration > 0.0 {
            component.total_concentration
        } else {
            FALLBACK_GUESS
        };
        log_activities[index] = guess.ln();
    }

    let mut report = SolveReport {
        iterations: 0,
        converged: unknowns.is_empty(),
        residual: 0.0,
    };

    while !report.converged && report.iterations < options.max_iterations {
        report.iterations += 1;
        let produced_activities = produced_log_activities(produced, &log_activities);

        let n = unknowns.len();
        let mut residuals = vec![0.0; n];
        let mut jacobian = vec![vec![0.0; n]; n];
        let mut residual = 0.0f64;

        for (row, &j) in unknowns.iter().enumerate() {
            let component = &components[j];
            let s_j = scales.of(component.phase);
            let a_j = log_activities[j].exp();
            let mut f = s_j * (a_j - component.total_concentration);
            let mut magnitude = s_j * (a_j + component.total_concentration.abs());
            jacobian[row][row] += s_j * a_j;

            for (species, &log_a) in produced.iter().zip(&produced_activities) {
                let Some(nu_j) = coefficient(species, j) else {
                    continue;
                };
                let weighted = scales.of(species.phase) * log_a.exp();
                f += nu_j * weighted;
                magnitude += nu_j.abs() * weighted;
                for (col, &k) in unknowns.iter().enumerate() {
                    if let Some(nu_k) = coefficient(species, k) {
                        jacobian[row][col] += nu_j * nu_k * weighted;
                    }
                }
            }

            residuals[row] = -f;
            if magnitude > 0.0 {
                residual = residual.max(f.abs() / magnitude);
            }
        }

        report.residual = residual;
        if residual < options.tolerance {
            report.converged = true;
            break;
        }

        let Some(mut step) = solve_linear(jacobian, residuals) else {
            warn!(iteration = report.iterations, "singular jacobian, stopping solver");
            break;
        };
        let largest = step.iter().fold(0.0f64, |m, d| m.max(d.abs()));
        if largest > MAX_STEP {
            let damping = MAX_STEP / largest;
            step.iter_mut().for_each(|d| *d *= damping);
        }
        for (&index, delta) in unknowns.iter().zip(step) {
            log_activities[index] += delta;
        }
    }

    for &index in &unknowns {
        components[index].concentration = log_activities[index].exp();
    }
    let produced_activities = produced_log_activities(produced, &log_activities);
    for (species, log_a) in produced.iter_mut().zip(produced_activities) {
        species.concentration = log_a.exp();
    }

    if report.converged {
        debug!(
            iterations = report.iterations,
            residual = report.residual,
            "equilibrium solved"
        );
    } else {
        warn!(
            iterations = report.iterations,
            residual = report.residual,
            "equilibrium did not converge"
        );
    }
    report
}

fn coefficient(species: &ProducedSpecies, component: usize) -> Option<f64> {
    species
        .stoichiometry
        .iter()
        .find(|&&(j, _)| j == component)
        .map(|&(_, nu)| nu)
}

fn produced_log_activities(produced: &[ProducedSpecies], log_activities: &[f64]) -> Vec<f64> {
    produced
        .iter()
        .map(|species| {
            species
                .stoichiometry
                .iter()
                .fold(species.log_k * LN_10, |acc, &(j, nu)| {
                    acc + nu * log_activities[j]
                })
        })
        .collect()
}

/// Gaussian elimination with partial pivoting. `None` if singular.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot][col].abs() < f64::MIN_POSITIVE {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
