//! Physical phase of a chemical species

use std::fmt;

/// Physical state of a chemical species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The solvent (water). Its activity is always 1.
    Solvent,
    /// Species dissolved in the solvent, expressed in mol/l.
    Aqueous,
    /// Surface species of a mineral, expressed as a fraction of the sites.
    Mineral,
}

impl Phase {
    /// Every phase known to the engine.
    pub const ALL: [Phase; 3] = [Phase::Solvent, Phase::Aqueous, Phase::Mineral];

    /// Canonical upper-case name of the phase
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Solvent => "SOLVENT",
            Phase::Aqueous => "AQUEOUS",
            Phase::Mineral => "MINERAL",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
