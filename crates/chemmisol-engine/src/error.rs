//! Engine error types

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the chemical engine.
///
/// The first three variants form the closed domain taxonomy: they are caused
/// by invalid chemical input and leave the system untouched, so the caller can
/// fix the input and retry. The remaining variants are lookups of names the
/// system does not know about, which indicate a programming error on the
/// caller's side.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A mineral component was added to a system without site parameters
    #[error(
        "cannot add the mineral component {component}: the sites quantity of \
         the system is undefined"
    )]
    InvalidMineralSpeciesWithUndefinedSitesCount {
        /// Name of the rejected component
        component: String,
    },

    /// Every reagent of a reaction is a component
    #[error("no produced species found in reaction {reaction}: all reagents ({reagents}) are components")]
    MissingProducedSpeciesInReaction {
        /// Reaction name
        reaction: String,
        /// Comma separated reagent names
        reagents: String,
    },

    /// More than one reagent of a reaction is not a component
    #[error("too many produced species in reaction {reaction}: {produced} are not components")]
    TooManyProducedSpeciesInReaction {
        /// Reaction name
        reaction: String,
        /// Comma separated names of the reagents that are not components
        produced: String,
    },

    /// No component with this name
    #[error("unknown component: {0}")]
    UnknownComponent(String),

    /// No species with this name
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// No reaction with this name
    #[error("unknown reaction: {0}")]
    UnknownReaction(String),
}
