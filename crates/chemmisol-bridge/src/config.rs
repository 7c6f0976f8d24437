//! Bridge configuration
//!
//! Options are read from the environment when the process-wide bridge is
//! first used. Invalid values are reported and replaced by the defaults.

use std::str::FromStr;

use chemmisol_engine::{SolverOptions, DEFAULT_MAX_ITERATION, DEFAULT_TOLERANCE};
use tracing::warn;

/// Iteration bound of every solve
pub const MAX_ITERATIONS_VAR: &str = "CHEMMISOL_MAX_ITERATIONS";

/// Relative residual tolerance of every solve
pub const TOLERANCE_VAR: &str = "CHEMMISOL_TOLERANCE";

/// Options applied by the entry points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeOptions {
    /// Iteration bound set right before each solve
    pub max_iterations: usize,
    /// Relative residual tolerance set right before each solve
    pub tolerance: f64,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATION,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BridgeOptions {
    /// Read the options from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the options through `lookup`, which maps a variable to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_iterations: parse(
                MAX_ITERATIONS_VAR,
                lookup(MAX_ITERATIONS_VAR),
                defaults.max_iterations,
                |&n| n > 0,
            ),
            tolerance: parse(
                TOLERANCE_VAR,
                lookup(TOLERANCE_VAR),
                defaults.tolerance,
                |&t: &f64| t.is_finite() && t > 0.0,
            ),
        }
    }

    /// Engine solver options
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

fn parse<T>(var: &str, raw: Option<String>, default: T, valid: impl Fn(&T) -> bool) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!(var, value = %raw, default = %default, "invalid configuration value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn read(vars: &[(&str, &str)]) -> BridgeOptions {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BridgeOptions::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let options = read(&[]);
        assert_eq!(options.max_iterations, 1000);
        assert_eq!(options.tolerance, 1e-12);
    }

    #[test]
    fn test_overrides() {
        let options = read(&[(MAX_ITERATIONS_VAR, "250"), (TOLERANCE_VAR, " 1e-9 ")]);
        assert_eq!(options.max_iterations, 250);
        assert_eq!(options.tolerance, 1e-9);
        assert_eq!(options.solver_options().max_iterations, 250);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let options = read(&[(MAX_ITERATIONS_VAR, "0"), (TOLERANCE_VAR, "-1")]);
        assert_eq!(options, BridgeOptions::default());
        let options = read(&[(MAX_ITERATIONS_VAR, "many"), (TOLERANCE_VAR, "NaN")]);
        assert_eq!(options, BridgeOptions::default());
    }
}
