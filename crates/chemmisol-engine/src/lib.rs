//! Chemmisol engine - chemical equilibrium solver
//!
//! The engine is the native side of the chemmisol bridge. It owns the chemical
//! system (components, reactions and the species they produce), validates the
//! reaction topology and solves the equilibrium state.
//!
//! # Conventions
//!
//! - A reaction is a list of reagents with signed integer coefficients and a
//!   `log K`. Its reaction quotient is `Q = Π a_i^(-c_i)` and the equilibrium
//!   state satisfies `Q = 10^logK`.
//! - Each reaction must produce exactly one species that is not a declared
//!   component.
//! - Solvent activity is 1. Mineral species are expressed as site fractions,
//!   their molar quantity is `fraction * sites_quantity`.
//!
//! # Example
//!
//! ```ignore
//! use chemmisol_engine::{ChemicalSystem, Phase, Reagent};
//!
//! let mut system = ChemicalSystem::new();
//! system.add_component("H2O", Phase::Solvent, 1.0)?;
//! system.add_component("H+", Phase::Aqueous, 0.0)?;
//! system.add_reaction("OH-", -14.0, vec![
//!     Reagent::new("H2O", Phase::Solvent, 1),
//!     Reagent::new("OH-", Phase::Aqueous, -1),
//!     Reagent::new("H+", Phase::Aqueous, -1),
//! ]);
//! system.solve_equilibrium()?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod phase;
pub mod solver;
pub mod system;

pub use error::{EngineError, EngineResult};
pub use phase::Phase;
pub use solver::{SolveReport, SolverOptions, DEFAULT_MAX_ITERATION, DEFAULT_TOLERANCE};
pub use system::{ChemicalSystem, Component, ProducedSpecies, Reagent};
