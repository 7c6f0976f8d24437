//! Engines owned through handles
//!
//! `Bridge` is the native side of every entry point: it owns the engines
//! created on behalf of the host and applies the operations to them. Its
//! methods take plain Rust values and descriptors, the host-facing wrappers
//! live in [`crate::entry`].

use chemmisol_engine::{ChemicalSystem, Phase, Reagent, SolveReport};
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::config::BridgeOptions;
use crate::descriptor::{ComponentSource, ComponentSpec, ReactionSource, ReactionSpec};
use crate::error::{BridgeError, BridgeResult};
use crate::registry::HandleRegistry;

static GLOBAL: Lazy<Bridge> = Lazy::new(|| Bridge::new(BridgeOptions::from_env()));

/// Engine owner and operation dispatcher
pub struct Bridge {
    engines: HandleRegistry<ChemicalSystem>,
    options: BridgeOptions,
}

impl Bridge {
    /// Create a bridge without engines
    pub fn new(options: BridgeOptions) -> Self {
        Self {
            engines: HandleRegistry::new(),
            options,
        }
    }

    /// The process-wide bridge used by the host exports
    pub fn global() -> &'static Bridge {
        &GLOBAL
    }

    /// Options applied to every solve
    pub fn options(&self) -> BridgeOptions {
        self.options
    }

    /// Number of engines not disposed yet
    pub fn live_engines(&self) -> usize {
        self.engines.len()
    }

    /// Run `f` on the engine of `handle`, holding its lock
    pub fn with_engine<R>(
        &self,
        handle: i64,
        f: impl FnOnce(&mut ChemicalSystem) -> BridgeResult<R>,
    ) -> BridgeResult<R> {
        let engine = self
            .engines
            .get(handle)
            .ok_or(BridgeError::StaleHandle(handle))?;
        let mut engine = engine.lock();
        f(&mut engine)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create an engine without mineral parameters
    pub fn allocate(&self) -> i64 {
        let handle = self.engines.insert(ChemicalSystem::new());
        debug!(handle, "chemical system allocated");
        handle
    }

    /// Create a mineral engine
    pub fn allocate_mineral(
        &self,
        solid_concentration: f64,
        specific_surface_area: f64,
        site_concentration: f64,
    ) -> i64 {
        let system = ChemicalSystem::with_sites(
            solid_concentration,
            specific_surface_area,
            site_concentration,
        );
        info!(sites_quantity = system.sites_quantity(), "Mineral system");
        self.engines.insert(system)
    }

    /// Create a mineral engine holding the surface complex as a mineral
    /// component of total fraction 1
    pub fn allocate_with_surface_complex(
        &self,
        solid_concentration: f64,
        specific_surface_area: f64,
        site_concentration: f64,
        surface_complex: &str,
    ) -> BridgeResult<i64> {
        let mut system = ChemicalSystem::with_sites(
            solid_concentration,
            specific_surface_area,
            site_concentration,
        );
        system.add_component(surface_complex, Phase::Mineral, 1.0)?;
        info!(
            sites_quantity = system.sites_quantity(),
            surface_complex, "Mineral system"
        );
        Ok(self.engines.insert(system))
    }

    /// Destroy the engine of `handle`, which becomes stale
    pub fn dispose(&self, handle: i64) -> BridgeResult<()> {
        self.engines
            .remove(handle)
            .map(|_| debug!(handle, "chemical system disposed"))
            .ok_or(BridgeError::StaleHandle(handle))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Add a reaction read from `source`, replacing any reaction of the same
    /// name. The topology is validated by [`Bridge::set_up`].
    pub fn add_reaction(&self, handle: i64, source: &dyn ReactionSource) -> BridgeResult<()> {
        let reaction = ReactionSpec::read(source)?;
        self.with_engine(handle, |system| {
            info!("Adding reaction: {} (log K={}): ", reaction.name, reaction.log_k);
            for reagent in &reaction.reagents {
                info!("  {} {} ({})", reagent.coefficient, reagent.name, reagent.phase);
            }
            let reagents: Vec<Reagent> = reaction.reagents.into_iter().map(Reagent::from).collect();
            system.add_reaction(reaction.name, reaction.log_k, reagents);
            Ok(())
        })
    }

    /// Add a component read from `source`
    pub fn add_component(&self, handle: i64, source: &dyn ComponentSource) -> BridgeResult<()> {
        let component = ComponentSpec::read(source)?;
        self.with_engine(handle, |system| {
            info!(
                "Adding component: {} ({}): {}",
                component.name, component.phase, component.total_concentration
            );
            system.add_component(component.name, component.phase, component.total_concentration)?;
            Ok(())
        })
    }

    /// Fix the pH through the named component
    pub fn fix_ph(&self, handle: i64, ph: f64, h_component: &str) -> BridgeResult<()> {
        self.with_engine(handle, |system| {
            info!("Fixing pH to {ph} in the {h_component} component.");
            system.fix_ph(ph, h_component);
            Ok(())
        })
    }

    /// Set the total concentration of an existing component
    pub fn set_total_concentration(&self, handle: i64, component: &str, concentration: f64) -> BridgeResult<()> {
        self.with_engine(handle, |system| {
            info!("Set total concentration of {component} to {concentration}.");
            system.set_total_concentration(component, concentration)?;
            Ok(())
        })
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Validate the reaction topology
    pub fn set_up(&self, handle: i64) -> BridgeResult<()> {
        self.with_engine(handle, |system| Ok(system.set_up()?))
    }

    /// Solve the equilibrium with the configured iteration bound
    pub fn solve(&self, handle: i64) -> BridgeResult<SolveReport> {
        let options = self.options;
        self.with_engine(handle, |system| {
            info!("Solving system using {} iterations.", options.max_iterations);
            system.set_options(options.solver_options());
            let report = system.solve_equilibrium()?;
            info!(iterations = report.iterations, converged = report.converged, "Done.");
            Ok(report)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Concentration of a component or produced species
    pub fn concentration(&self, handle: i64, species: &str) -> BridgeResult<f64> {
        self.with_engine(handle, |system| Ok(system.concentration(species)?))
    }

    /// Reaction quotient of the named reaction
    pub fn reaction_quotient(&self, handle: i64, reaction: &str) -> BridgeResult<f64> {
        self.with_engine(handle, |system| Ok(system.reaction_quotient(reaction)?))
    }

    /// Quantity of surface sites, 0 without mineral parameters
    pub fn sites_quantity(&self, handle: i64) -> BridgeResult<f64> {
        self.with_engine(handle, |system| Ok(system.sites_quantity()))
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(BridgeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ReagentSpec;
    use crate::exception::CoreErrorKind;

    fn water() -> ReactionSpec {
        ReactionSpec::new(
            "water",
            -14.0,
            vec![
                ReagentSpec::new("H2O", Phase::Solvent, 1),
                ReagentSpec::new("OH-", Phase::Aqueous, -1),
                ReagentSpec::new("H+", Phase::Aqueous, -1),
            ],
        )
    }

    #[test]
    fn test_lifecycle() {
        let bridge = Bridge::default();
        let handle = bridge.allocate();
        assert_eq!(bridge.live_engines(), 1);
        assert_eq!(bridge.sites_quantity(handle), Ok(0.0));
        bridge.dispose(handle).unwrap();
        assert_eq!(bridge.live_engines(), 0);
        assert_eq!(bridge.sites_quantity(handle), Err(BridgeError::StaleHandle(handle)));
        assert_eq!(bridge.dispose(handle), Err(BridgeError::StaleHandle(handle)));
    }

    #[test]
    fn test_water() {
        let bridge = Bridge::default();
        let handle = bridge.allocate();
        bridge
            .add_component(handle, &ComponentSpec::new("H2O", Phase::Solvent, 1.0))
            .unwrap();
        bridge
            .add_component(handle, &ComponentSpec::new("H+", Phase::Aqueous, 0.0))
            .unwrap();
        bridge.add_reaction(handle, &water()).unwrap();
        bridge.set_up(handle).unwrap();
        let report = bridge.solve(handle).unwrap();

        assert!(report.converged);
        let h = bridge.concentration(handle, "H+").unwrap();
        assert!((h - 1e-7).abs() < 1e-12, "H+ = {h}");
    }

    #[test]
    fn test_mineral_component_needs_sites() {
        let bridge = Bridge::default();
        let handle = bridge.allocate();
        let err = bridge
            .add_component(handle, &ComponentSpec::new("=SOH", Phase::Mineral, 1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Core {
                kind: CoreErrorKind::InvalidMineralSpeciesWithUndefinedSitesCount,
                ..
            }
        ));
    }

    #[test]
    fn test_surface_complex_allocation() {
        let bridge = Bridge::default();
        let handle = bridge
            .allocate_with_surface_complex(1.0, 0.5, 5e-3, "=SOH")
            .unwrap();
        assert_eq!(bridge.sites_quantity(handle), Ok(2.5e-3));
        let total = bridge
            .with_engine(handle, |system| Ok(system.component("=SOH")?.total_concentration()))
            .unwrap();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_solve_uses_configured_bound() {
        let bridge = Bridge::new(BridgeOptions {
            max_iterations: 7,
            tolerance: 1e-10,
        });
        let handle = bridge.allocate();
        bridge.solve(handle).unwrap();
        let options = bridge
            .with_engine(handle, |system| Ok(system.options()))
            .unwrap();
        assert_eq!(options.max_iterations, 7);
        assert_eq!(options.tolerance, 1e-10);
    }
}
