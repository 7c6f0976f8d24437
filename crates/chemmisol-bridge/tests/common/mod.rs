//! Host fixtures for bridge integration tests
//!
//! Builds an in-memory host exposing the managed classes the bridge reads:
//! the `Phase` enum, `Reaction`, `Reagent` and `ChemicalComponent`.

#![allow(dead_code)]

use chemmisol_bridge::PHASE_CLASS;
use chemmisol_engine::Phase;
use chemmisol_sdk::{HostValue, InMemoryHost, ObjectRef, ThrownException};

pub const REACTION_CLASS: &str = "ummisco/gama/chemmisol/Reaction";
pub const REAGENT_CLASS: &str = "ummisco/gama/chemmisol/Reagent";
pub const COMPONENT_CLASS: &str = "ummisco/gama/chemmisol/ChemicalComponent";

const STRING_SIG: &str = "()Ljava/lang/String;";
const PHASE_SIG: &str = "()Lummisco/gama/chemmisol/Phase;";

pub struct Fixture {
    pub host: InMemoryHost,
    phases: Vec<ObjectRef>,
}

impl Fixture {
    pub fn new() -> Self {
        let host = InMemoryHost::new();
        let phases = host.define_enum(PHASE_CLASS, &["SOLVENT", "AQUEOUS", "MINERAL"]);
        host.define_class(REACTION_CLASS)
            .getter("getName", STRING_SIG, "name")
            .getter("getLogK", "()D", "logK")
            .getter("getReagents", "()Ljava/util/List;", "reagents");
        host.define_class(REAGENT_CLASS)
            .getter("getName", STRING_SIG, "name")
            .getter("getPhase", PHASE_SIG, "phase")
            .getter("getCoefficient", "()I", "coefficient");
        host.define_class(COMPONENT_CLASS)
            .getter("getName", STRING_SIG, "name")
            .getter("getPhase", PHASE_SIG, "phase")
            .getter("getTotalConcentration", "()D", "totalConcentration");
        Self { host, phases }
    }

    pub fn phase(&self, phase: Phase) -> HostValue {
        let index = Phase::ALL.iter().position(|p| *p == phase).unwrap_or(0);
        HostValue::Object(self.phases[index])
    }

    pub fn string(&self, s: &str) -> HostValue {
        HostValue::Object(self.host.new_string(s))
    }

    pub fn reagent(&self, name: &str, phase: Phase, coefficient: i32) -> HostValue {
        let obj = self.host.new_object(
            REAGENT_CLASS,
            &[
                ("name", self.string(name)),
                ("phase", self.phase(phase)),
                ("coefficient", HostValue::Int(coefficient)),
            ],
        );
        HostValue::Object(obj)
    }

    pub fn reaction(&self, name: &str, log_k: f64, reagents: &[(&str, Phase, i32)]) -> HostValue {
        let reagents: Vec<HostValue> = reagents
            .iter()
            .map(|&(name, phase, coefficient)| self.reagent(name, phase, coefficient))
            .collect();
        let list = self.host.new_list(&reagents);
        let obj = self.host.new_object(
            REACTION_CLASS,
            &[
                ("name", self.string(name)),
                ("logK", HostValue::Double(log_k)),
                ("reagents", HostValue::Object(list)),
            ],
        );
        HostValue::Object(obj)
    }

    pub fn component(&self, name: &str, phase: Phase, total_concentration: f64) -> HostValue {
        let obj = self.host.new_object(
            COMPONENT_CLASS,
            &[
                ("name", self.string(name)),
                ("phase", self.phase(phase)),
                ("totalConcentration", HostValue::Double(total_concentration)),
            ],
        );
        HostValue::Object(obj)
    }

    pub fn take_exception(&self) -> Option<ThrownException> {
        self.host.take_exception()
    }

    pub fn assert_no_exception(&self) {
        if let Some(thrown) = self.take_exception() {
            panic!("unexpected host exception {}: {}", thrown.class, thrown.message);
        }
    }
}

pub fn assert_close(expected: f64, actual: f64) {
    let tolerance = 1e-8 * expected.abs().max(actual.abs());
    assert!(
        (expected - actual).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
