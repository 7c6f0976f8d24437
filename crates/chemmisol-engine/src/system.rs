//! Chemical system: components, reactions and produced species

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::phase::Phase;
use crate::solver::{self, SolveReport, SolverOptions};

// ============================================================================
// Building blocks
// ============================================================================

/// Mineral parameters defining the quantity of reactive surface sites.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SiteParameters {
    /// Quantity of mineral in suspension (g/l)
    solid_concentration: f64,
    /// Surface in contact with the solution per unit of mass (m2/g)
    specific_surface_area: f64,
    /// Quantity of sites per unit of surface (mol/m2)
    site_concentration: f64,
}

impl SiteParameters {
    /// Sites quantity in mol/l
    fn sites_quantity(&self) -> f64 {
        self.solid_concentration * self.specific_surface_area * self.site_concentration
    }
}

/// A reagent of a reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Reagent {
    /// Species name
    pub name: String,
    /// Species phase
    pub phase: Phase,
    /// Stoichiometric coefficient, negative on the produced side
    pub coefficient: i32,
}

impl Reagent {
    /// Create a reagent
    pub fn new(name: impl Into<String>, phase: Phase, coefficient: i32) -> Self {
        Self {
            name: name.into(),
            phase,
            coefficient,
        }
    }
}

/// A component: a species whose total concentration constrains the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub(crate) name: String,
    pub(crate) phase: Phase,
    pub(crate) total_concentration: f64,
    pub(crate) concentration: f64,
    pub(crate) fixed: bool,
}

impl Component {
    fn new(name: String, phase: Phase, total_concentration: f64) -> Self {
        let concentration = match phase {
            Phase::Solvent => 1.0,
            _ => total_concentration.max(0.0),
        };
        Self {
            name,
            phase,
            total_concentration,
            concentration,
            fixed: false,
        }
    }

    /// Component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Component phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Total concentration constraint
    pub fn total_concentration(&self) -> f64 {
        self.total_concentration
    }

    /// Free concentration of the component species
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    /// Whether the concentration is fixed (e.g. by `fix_ph`)
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Reaction {
    name: String,
    log_k: f64,
    reagents: Vec<Reagent>,
}

/// A species formed by a reaction, expressed from the components.
///
/// `log10(a) = log_k + Σ ν_j log10(a_j)` over the stoichiometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducedSpecies {
    pub(crate) name: String,
    pub(crate) phase: Phase,
    pub(crate) log_k: f64,
    pub(crate) stoichiometry: Vec<(usize, f64)>,
    pub(crate) concentration: f64,
}

impl ProducedSpecies {
    /// Species name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Equilibrium concentration after the last solve
    pub fn concentration(&self) -> f64 {
        self.concentration
    }
}

pub(crate) fn activity(phase: Phase, concentration: f64) -> f64 {
    match phase {
        Phase::Solvent => 1.0,
        Phase::Aqueous | Phase::Mineral => concentration,
    }
}

// ============================================================================
// ChemicalSystem
// ============================================================================

/// A chemical system where components react to form other species.
///
/// Configuration (components, reactions, pH) accumulates until [`set_up`]
/// validates the reaction topology. [`solve_equilibrium`] sets the system up
/// again if the topology changed since the last validation.
///
/// [`set_up`]: ChemicalSystem::set_up
/// [`solve_equilibrium`]: ChemicalSystem::solve_equilibrium
#[derive(Debug, Clone, Default)]
pub struct ChemicalSystem {
    sites: Option<SiteParameters>,
    components: Vec<Component>,
    reactions: Vec<Reaction>,
    produced: Vec<ProducedSpecies>,
    options: SolverOptions,
    dirty: bool,
}

impl ChemicalSystem {
    /// Create a system without mineral parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mineral system with a defined sites quantity
    pub fn with_sites(
        solid_concentration: f64,
        specific_surface_area: f64,
        site_concentration: f64,
    ) -> Self {
        Self {
            sites: Some(SiteParameters {
                solid_concentration,
                specific_surface_area,
                site_concentration,
            }),
            ..Self::default()
        }
    }

    /// Quantity of surface sites in mol/l, 0 without mineral parameters
    pub fn sites_quantity(&self) -> f64 {
        self.sites.map_or(0.0, |s| s.sites_quantity())
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Add or redefine a component.
    ///
    /// Fails without touching the system when a mineral component is added to
    /// a system that has no site parameters.
    pub fn add_component(
        &mut self,
        name: impl Into<String>,
        phase: Phase,
        total_concentration: f64,
    ) -> EngineResult<()> {
        let name = name.into();
        if phase == Phase::Mineral && self.sites.is_none() {
            return Err(EngineError::InvalidMineralSpeciesWithUndefinedSitesCount {
                component: name,
            });
        }
        let component = Component::new(name, phase, total_concentration);
        match self.component_index(&component.name) {
            Some(index) => self.components[index] = component,
            None => self.components.push(component),
        }
        self.dirty = true;
        Ok(())
    }

    /// Add a reaction, replacing any reaction with the same name.
    ///
    /// The reaction is only validated by [`ChemicalSystem::set_up`].
    pub fn add_reaction(&mut self, name: impl Into<String>, log_k: f64, reagents: Vec<Reagent>) {
        let reaction = Reaction {
            name: name.into(),
            log_k,
            reagents,
        };
        match self.reactions.iter().position(|r| r.name == reaction.name) {
            Some(index) => self.reactions[index] = reaction,
            None => self.reactions.push(reaction),
        }
        self.dirty = true;
    }

    /// Fix the pH through the component named `h_component`.
    ///
    /// The component is created as an aqueous component when it does not
    /// exist yet. Its concentration is fixed at `10^-ph`.
    pub fn fix_ph(&mut self, ph: f64, h_component: &str) {
        let concentration = 10f64.powf(-ph);
        let index = match self.component_index(h_component) {
            Some(index) => index,
            None => {
                self.components.push(Component::new(
                    h_component.to_string(),
                    Phase::Aqueous,
                    concentration,
                ));
                self.dirty = true;
                self.components.len() - 1
            }
        };
        let component = &mut self.components[index];
        component.total_concentration = concentration;
        component.concentration = concentration;
        component.fixed = true;
    }

    /// Set the total concentration of an existing component
    pub fn set_total_concentration(&mut self, name: &str, concentration: f64) -> EngineResult<()> {
        let index = self
            .component_index(name)
            .ok_or_else(|| EngineError::UnknownComponent(name.to_string()))?;
        let component = &mut self.components[index];
        component.total_concentration = concentration;
        if component.fixed {
            component.concentration = concentration;
        }
        Ok(())
    }

    /// Set the iteration bound and tolerance of the next solve
    pub fn set_options(&mut self, options: SolverOptions) {
        self.options = options;
    }

    /// Current solver options
    pub fn options(&self) -> SolverOptions {
        self.options
    }

    // ========================================================================
    // Validation and solving
    // ========================================================================

    /// Validate the reaction topology and build the produced species.
    ///
    /// Each reaction must contain exactly one reagent that is not a
    /// component. On failure the previous set up is kept intact.
    pub fn set_up(&mut self) -> EngineResult<()> {
        let mut produced = Vec::with_capacity(self.reactions.len());
        for reaction in &self.reactions {
            produced.push(self.produced_species(reaction)?);
        }
        debug!(
            reactions = self.reactions.len(),
            components = self.components.len(),
            "chemical system set up"
        );
        self.produced = produced;
        self.dirty = false;
        self.refresh_produced();
        Ok(())
    }

    /// Solve the equilibrium state, setting the system up first if needed
    pub fn solve_equilibrium(&mut self) -> EngineResult<SolveReport> {
        if self.dirty {
            self.set_up()?;
        }
        let sites_quantity = self.sites_quantity();
        Ok(solver::solve(
            &mut self.components,
            &mut self.produced,
            sites_quantity,
            &self.options,
        ))
    }

    fn produced_species(&self, reaction: &Reaction) -> EngineResult<ProducedSpecies> {
        let mut candidates: Vec<&Reagent> = Vec::new();
        for reagent in &reaction.reagents {
            if self.component_index(&reagent.name).is_none()
                && !candidates.iter().any(|c| c.name == reagent.name)
            {
                candidates.push(reagent);
            }
        }

        let missing = || EngineError::MissingProducedSpeciesInReaction {
            reaction: reaction.name.clone(),
            reagents: join_names(reaction.reagents.iter()),
        };
        let target = match candidates.as_slice() {
            [single] => *single,
            [] => return Err(missing()),
            _ => {
                return Err(EngineError::TooManyProducedSpeciesInReaction {
                    reaction: reaction.name.clone(),
                    produced: join_names(candidates.iter().copied()),
                })
            }
        };

        // Repeated occurrences of the produced species add up.
        let coefficient: f64 = reaction
            .reagents
            .iter()
            .filter(|r| r.name == target.name)
            .map(|r| f64::from(r.coefficient))
            .sum();
        if coefficient == 0.0 {
            return Err(missing());
        }

        let scale = -coefficient;
        let mut stoichiometry: Vec<(usize, f64)> = Vec::new();
        for reagent in reaction.reagents.iter().filter(|r| r.name != target.name) {
            // Only components remain once the target is filtered out.
            let Some(index) = self.component_index(&reagent.name) else {
                continue;
            };
            let nu = f64::from(reagent.coefficient) / scale;
            match stoichiometry.iter_mut().find(|(i, _)| *i == index) {
                Some((_, existing)) => *existing += nu,
                None => stoichiometry.push((index, nu)),
            }
        }

        let concentration = self
            .produced
            .iter()
            .find(|p| p.name == target.name)
            .map_or(0.0, |p| p.concentration);

        Ok(ProducedSpecies {
            name: target.name.clone(),
            phase: target.phase,
            log_k: reaction.log_k / scale,
            stoichiometry,
            concentration,
        })
    }

    fn refresh_produced(&mut self) {
        for species in &mut self.produced {
            let mut log_activity = species.log_k;
            for &(index, nu) in &species.stoichiometry {
                let component = &self.components[index];
                log_activity += nu * activity(component.phase, component.concentration).log10();
            }
            species.concentration = 10f64.powf(log_activity);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a component by name
    pub fn component(&self, name: &str) -> EngineResult<&Component> {
        self.component_index(name)
            .map(|index| &self.components[index])
            .ok_or_else(|| EngineError::UnknownComponent(name.to_string()))
    }

    /// All components, in insertion order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Species produced by the reactions, as of the last set up
    pub fn produced(&self) -> &[ProducedSpecies] {
        &self.produced
    }

    /// Concentration of a component or produced species
    pub fn concentration(&self, species: &str) -> EngineResult<f64> {
        self.species_state(species).map(|(_, concentration)| concentration)
    }

    /// Reaction quotient `Π a_i^(-c_i)` of the named reaction
    pub fn reaction_quotient(&self, reaction: &str) -> EngineResult<f64> {
        let reaction = self
            .reactions
            .iter()
            .find(|r| r.name == reaction)
            .ok_or_else(|| EngineError::UnknownReaction(reaction.to_string()))?;
        let mut quotient = 1.0;
        for reagent in &reaction.reagents {
            let (phase, concentration) = self.species_state(&reagent.name)?;
            quotient *= activity(phase, concentration).powf(-f64::from(reagent.coefficient));
        }
        Ok(quotient)
    }

    fn species_state(&self, name: &str) -> EngineResult<(Phase, f64)> {
        if let Some(component) = self.components.iter().find(|c| c.name == name) {
            return Ok((component.phase, component.concentration));
        }
        self.produced
            .iter()
            .find(|p| p.name == name)
            .map(|p| (p.phase, p.concentration))
            .ok_or_else(|| EngineError::UnknownSpecies(name.to_string()))
    }

    fn component_index(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }
}

fn join_names<'a>(reagents: impl Iterator<Item = &'a Reagent>) -> String {
    reagents
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
