//! Reaction, reagent and component descriptors
//!
//! The bridge reads descriptors through capability traits. Host objects
//! implement them by dynamic invocation of their accessors; plain Rust
//! callers use the `*Spec` values directly.

use chemmisol_engine::{Phase, Reagent};
use chemmisol_sdk::HostObject;

use crate::error::BridgeResult;
use crate::phase::PhaseTable;

const GET_NAME: (&str, &str) = ("getName", "()Ljava/lang/String;");
const GET_PHASE: (&str, &str) = ("getPhase", "()Lummisco/gama/chemmisol/Phase;");
const GET_LOG_K: (&str, &str) = ("getLogK", "()D");
const GET_REAGENTS: (&str, &str) = ("getReagents", "()Ljava/util/List;");
const GET_COEFFICIENT: (&str, &str) = ("getCoefficient", "()I");
const GET_TOTAL_CONCENTRATION: (&str, &str) = ("getTotalConcentration", "()D");

// ============================================================================
// Capabilities
// ============================================================================

/// A reagent of a reaction
pub trait ReagentSource {
    /// Species name
    fn name(&self) -> BridgeResult<String>;
    /// Species phase
    fn phase(&self) -> BridgeResult<Phase>;
    /// Signed stoichiometric coefficient
    fn coefficient(&self) -> BridgeResult<i32>;
}

/// A reaction between reagents
pub trait ReactionSource {
    /// Reaction name
    fn name(&self) -> BridgeResult<String>;
    /// Decimal logarithm of the equilibrium constant
    fn log_k(&self) -> BridgeResult<f64>;
    /// Reagents, in declaration order
    fn reagents(&self) -> BridgeResult<Vec<ReagentSpec>>;
}

/// A component of the chemical system
pub trait ComponentSource {
    /// Component name
    fn name(&self) -> BridgeResult<String>;
    /// Component phase
    fn phase(&self) -> BridgeResult<Phase>;
    /// Total concentration (a fraction for mineral components)
    fn total_concentration(&self) -> BridgeResult<f64>;
}

// ============================================================================
// Native descriptors
// ============================================================================

/// Reagent values
#[derive(Debug, Clone, PartialEq)]
pub struct ReagentSpec {
    /// Species name
    pub name: String,
    /// Species phase
    pub phase: Phase,
    /// Signed stoichiometric coefficient
    pub coefficient: i32,
}

impl ReagentSpec {
    /// Create a reagent
    pub fn new(name: impl Into<String>, phase: Phase, coefficient: i32) -> Self {
        Self {
            name: name.into(),
            phase,
            coefficient,
        }
    }

    /// Read every field of a reagent source
    pub fn read(source: &dyn ReagentSource) -> BridgeResult<Self> {
        Ok(Self {
            name: source.name()?,
            phase: source.phase()?,
            coefficient: source.coefficient()?,
        })
    }
}

impl From<ReagentSpec> for Reagent {
    fn from(spec: ReagentSpec) -> Self {
        Reagent::new(spec.name, spec.phase, spec.coefficient)
    }
}

/// Reaction values
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionSpec {
    /// Reaction name
    pub name: String,
    /// Decimal logarithm of the equilibrium constant
    pub log_k: f64,
    /// Reagents
    pub reagents: Vec<ReagentSpec>,
}

impl ReactionSpec {
    /// Create a reaction
    pub fn new(name: impl Into<String>, log_k: f64, reagents: Vec<ReagentSpec>) -> Self {
        Self {
            name: name.into(),
            log_k,
            reagents,
        }
    }

    /// Read every field of a reaction source
    pub fn read(source: &dyn ReactionSource) -> BridgeResult<Self> {
        Ok(Self {
            name: source.name()?,
            log_k: source.log_k()?,
            reagents: source.reagents()?,
        })
    }
}

/// Component values
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    /// Component name
    pub name: String,
    /// Component phase
    pub phase: Phase,
    /// Total concentration
    pub total_concentration: f64,
}

impl ComponentSpec {
    /// Create a component
    pub fn new(name: impl Into<String>, phase: Phase, total_concentration: f64) -> Self {
        Self {
            name: name.into(),
            phase,
            total_concentration,
        }
    }

    /// Read every field of a component source
    pub fn read(source: &dyn ComponentSource) -> BridgeResult<Self> {
        Ok(Self {
            name: source.name()?,
            phase: source.phase()?,
            total_concentration: source.total_concentration()?,
        })
    }
}

impl ReagentSource for ReagentSpec {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.name.clone())
    }

    fn phase(&self) -> BridgeResult<Phase> {
        Ok(self.phase)
    }

    fn coefficient(&self) -> BridgeResult<i32> {
        Ok(self.coefficient)
    }
}

impl ReactionSource for ReactionSpec {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.name.clone())
    }

    fn log_k(&self) -> BridgeResult<f64> {
        Ok(self.log_k)
    }

    fn reagents(&self) -> BridgeResult<Vec<ReagentSpec>> {
        Ok(self.reagents.clone())
    }
}

impl ComponentSource for ComponentSpec {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.name.clone())
    }

    fn phase(&self) -> BridgeResult<Phase> {
        Ok(self.phase)
    }

    fn total_concentration(&self) -> BridgeResult<f64> {
        Ok(self.total_concentration)
    }
}

// ============================================================================
// Host descriptors
// ============================================================================

fn host_phase(obj: &HostObject<'_>, phases: &PhaseTable) -> BridgeResult<Phase> {
    let phase = obj.call_object(GET_PHASE.0, GET_PHASE.1, &[])?;
    phases.phase_of(&phase)
}

/// Host `Reagent` object
pub struct HostReagent<'a> {
    obj: HostObject<'a>,
    phases: &'a PhaseTable,
}

impl<'a> HostReagent<'a> {
    /// Wrap a host reagent
    pub fn new(obj: HostObject<'a>, phases: &'a PhaseTable) -> Self {
        Self { obj, phases }
    }
}

impl ReagentSource for HostReagent<'_> {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.obj.call_string(GET_NAME.0, GET_NAME.1, &[])?)
    }

    fn phase(&self) -> BridgeResult<Phase> {
        host_phase(&self.obj, self.phases)
    }

    fn coefficient(&self) -> BridgeResult<i32> {
        Ok(self.obj.call_int(GET_COEFFICIENT.0, GET_COEFFICIENT.1, &[])?)
    }
}

/// Host `Reaction` object
pub struct HostReaction<'a> {
    obj: HostObject<'a>,
    phases: &'a PhaseTable,
}

impl<'a> HostReaction<'a> {
    /// Wrap a host reaction
    pub fn new(obj: HostObject<'a>, phases: &'a PhaseTable) -> Self {
        Self { obj, phases }
    }
}

impl ReactionSource for HostReaction<'_> {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.obj.call_string(GET_NAME.0, GET_NAME.1, &[])?)
    }

    fn log_k(&self) -> BridgeResult<f64> {
        Ok(self.obj.call_double(GET_LOG_K.0, GET_LOG_K.1, &[])?)
    }

    fn reagents(&self) -> BridgeResult<Vec<ReagentSpec>> {
        self.obj
            .call_list(GET_REAGENTS.0, GET_REAGENTS.1)?
            .into_iter()
            .map(|obj| ReagentSpec::read(&HostReagent::new(obj, self.phases)))
            .collect()
    }
}

/// Host `ChemicalComponent` object
pub struct HostComponent<'a> {
    obj: HostObject<'a>,
    phases: &'a PhaseTable,
}

impl<'a> HostComponent<'a> {
    /// Wrap a host component
    pub fn new(obj: HostObject<'a>, phases: &'a PhaseTable) -> Self {
        Self { obj, phases }
    }
}

impl ComponentSource for HostComponent<'_> {
    fn name(&self) -> BridgeResult<String> {
        Ok(self.obj.call_string(GET_NAME.0, GET_NAME.1, &[])?)
    }

    fn phase(&self) -> BridgeResult<Phase> {
        host_phase(&self.obj, self.phases)
    }

    fn total_concentration(&self) -> BridgeResult<f64> {
        Ok(self
            .obj
            .call_double(GET_TOTAL_CONCENTRATION.0, GET_TOTAL_CONCENTRATION.1, &[])?)
    }
}
