//! Resolution of the host `Phase` enum
//!
//! The host enum constants are fetched once per process, by iterating the
//! native phases, and their names are recorded. Afterwards a host phase
//! object is converted by reading its `name()`.

use chemmisol_engine::Phase;
use chemmisol_sdk::{signature, HostContext, HostObject};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};

/// Class path of the host phase enum
pub const PHASE_CLASS: &str = "ummisco/gama/chemmisol/Phase";

const NAME_SIGNATURE: &str = "()Ljava/lang/String;";

static GLOBAL: OnceCell<PhaseTable> = OnceCell::new();

/// Host constant name to native phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTable {
    entries: Vec<(String, Phase)>,
}

impl PhaseTable {
    /// Build the table from the host enum class.
    ///
    /// Every native phase must exist as a static constant of the host class.
    pub fn resolve(ctx: &dyn HostContext) -> BridgeResult<Self> {
        let field_type = signature::object_type(PHASE_CLASS);
        let mut entries = Vec::with_capacity(Phase::ALL.len());
        for phase in Phase::ALL {
            let constant = HostObject::from_static_field(ctx, PHASE_CLASS, phase.name(), &field_type)?;
            let name = constant.call_string("name", NAME_SIGNATURE, &[])?;
            debug!(constant = %name, phase = %phase, "resolved host phase");
            entries.push((name, phase));
        }
        Ok(Self { entries })
    }

    /// The process-wide table, resolved on first use.
    ///
    /// A failed resolution is returned to the caller and attempted again on
    /// the next call.
    pub fn global(ctx: &dyn HostContext) -> BridgeResult<&'static PhaseTable> {
        GLOBAL.get_or_try_init(|| Self::resolve(ctx))
    }

    /// Native phase of a host constant name
    pub fn lookup(&self, name: &str) -> BridgeResult<Phase> {
        self.entries
            .iter()
            .find(|(constant, _)| constant == name)
            .map(|&(_, phase)| phase)
            .ok_or_else(|| BridgeError::UnmappedEnumConstant(name.to_string()))
    }

    /// Host constant name of a native phase
    pub fn host_name(&self, phase: Phase) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| *p == phase)
            .map(|(constant, _)| constant.as_str())
    }

    /// Native phase of a host phase object
    pub fn phase_of(&self, obj: &HostObject<'_>) -> BridgeResult<Phase> {
        let name = obj.call_string("name", NAME_SIGNATURE, &[])?;
        self.lookup(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemmisol_sdk::{HostError, HostValue, InMemoryHost};

    fn host_with_phases() -> (InMemoryHost, Vec<chemmisol_sdk::ObjectRef>) {
        let host = InMemoryHost::new();
        let constants = host.define_enum(PHASE_CLASS, &["SOLVENT", "AQUEOUS", "MINERAL"]);
        (host, constants)
    }

    #[test]
    fn test_resolve_every_phase() {
        let (host, constants) = host_with_phases();
        let table = PhaseTable::resolve(&host).unwrap();
        for (obj, phase) in constants.iter().zip(Phase::ALL) {
            let obj = HostObject::new(&host, *obj);
            assert_eq!(table.phase_of(&obj), Ok(phase));
            assert_eq!(table.host_name(phase), Some(phase.name()));
        }
    }

    #[test]
    fn test_unmapped_constant() {
        let (host, _) = host_with_phases();
        let table = PhaseTable::resolve(&host).unwrap();
        assert_eq!(
            table.lookup("GAS"),
            Err(BridgeError::UnmappedEnumConstant("GAS".into()))
        );

        // A constant the host adds later is not known natively.
        let name = host.new_string("GAS");
        let gas = host.new_object(
            PHASE_CLASS,
            &[("name", HostValue::Object(name)), ("ordinal", HostValue::Int(3))],
        );
        let gas = HostObject::new(&host, gas);
        assert!(matches!(
            table.phase_of(&gas),
            Err(BridgeError::UnmappedEnumConstant(_))
        ));
    }

    #[test]
    fn test_missing_host_constant() {
        let host = InMemoryHost::new();
        host.define_enum(PHASE_CLASS, &["SOLVENT", "AQUEOUS"]);
        assert!(matches!(
            PhaseTable::resolve(&host),
            Err(BridgeError::Host(HostError::FieldNotFound { ref name, .. })) if name == "MINERAL"
        ));
    }
}
