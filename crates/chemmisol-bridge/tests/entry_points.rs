//! Host entry points driven through an in-memory host

mod common;

use chemmisol_bridge::{entry, Bridge, CORE_EXCEPTION_CLASS};
use chemmisol_engine::Phase;
use chemmisol_sdk::HostValue;
use common::{assert_close, Fixture};

fn water_system(bridge: &Bridge, fx: &Fixture) -> i64 {
    let ctx = &fx.host;
    let handle = entry::allocate(bridge, ctx);
    entry::add_component(bridge, ctx, handle, fx.component("H2O", Phase::Solvent, 1.0));
    entry::add_component(bridge, ctx, handle, fx.component("H+", Phase::Aqueous, 0.0));
    handle
}

fn add_water_reaction(bridge: &Bridge, fx: &Fixture, handle: i64) {
    let reaction = fx.reaction(
        "water",
        -14.0,
        &[
            ("H2O", Phase::Solvent, 1),
            ("OH-", Phase::Aqueous, -1),
            ("H+", Phase::Aqueous, -1),
        ],
    );
    entry::add_reaction(bridge, &fx.host, handle, reaction);
}

#[test]
fn test_water_dissociation() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = water_system(&bridge, &fx);
    add_water_reaction(&bridge, &fx, handle);
    entry::set_up(&bridge, &fx.host, handle);
    entry::solve(&bridge, &fx.host, handle);
    fx.assert_no_exception();

    let h = entry::concentration(&bridge, &fx.host, handle, fx.string("H+"));
    let oh = entry::concentration(&bridge, &fx.host, handle, fx.string("OH-"));
    assert_close(1e-7, h);
    assert_close(1e-7, oh);
    assert_close(
        1e-14,
        entry::reaction_quotient(&bridge, &fx.host, handle, fx.string("water")),
    );
    entry::dispose(&bridge, &fx.host, handle);
    fx.assert_no_exception();
}

#[test]
fn test_solve_without_produced_species_then_retry() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = water_system(&bridge, &fx);
    let broken = fx.reaction(
        "water",
        -14.0,
        &[("H2O", Phase::Solvent, 1), ("H+", Phase::Aqueous, -1)],
    );
    entry::add_reaction(&bridge, &fx.host, handle, broken);
    fx.assert_no_exception();

    entry::solve(&bridge, &fx.host, handle);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, CORE_EXCEPTION_CLASS);
    assert!(
        thrown
            .message
            .starts_with("chemmisol::MissingProducedSpeciesInReaction: "),
        "{}",
        thrown.message
    );

    // Same name: the reaction is replaced.
    add_water_reaction(&bridge, &fx, handle);
    entry::solve(&bridge, &fx.host, handle);
    fx.assert_no_exception();
    assert_close(
        1e-7,
        entry::concentration(&bridge, &fx.host, handle, fx.string("H+")),
    );
}

#[test]
fn test_set_up_rejects_reaction_between_components() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    entry::add_component(&bridge, &fx.host, handle, fx.component("A", Phase::Aqueous, 0.1));
    entry::add_component(&bridge, &fx.host, handle, fx.component("B", Phase::Aqueous, 0.1));
    let reaction = fx.reaction("AB", 1.0, &[("A", Phase::Aqueous, 1), ("B", Phase::Aqueous, -1)]);
    entry::add_reaction(&bridge, &fx.host, handle, reaction);
    fx.assert_no_exception();

    entry::set_up(&bridge, &fx.host, handle);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, CORE_EXCEPTION_CLASS);
    assert!(thrown
        .message
        .starts_with("chemmisol::MissingProducedSpeciesInReaction: "));
    assert!(fx.take_exception().is_none());
}

#[test]
fn test_set_up_rejects_several_produced_species() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    entry::add_component(&bridge, &fx.host, handle, fx.component("A", Phase::Aqueous, 0.1));
    let reaction = fx.reaction(
        "X",
        1.0,
        &[
            ("A", Phase::Aqueous, 1),
            ("B", Phase::Aqueous, -1),
            ("C", Phase::Aqueous, -1),
        ],
    );
    entry::add_reaction(&bridge, &fx.host, handle, reaction);
    entry::set_up(&bridge, &fx.host, handle);

    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, CORE_EXCEPTION_CLASS);
    assert!(thrown
        .message
        .starts_with("chemmisol::TooManyProducedSpeciesInReaction: "));
}

#[test]
fn test_solve_rejects_several_produced_species_and_keeps_state() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let ctx = &fx.host;
    let handle = water_system(&bridge, &fx);
    add_water_reaction(&bridge, &fx, handle);
    entry::set_up(&bridge, ctx, handle);
    entry::solve(&bridge, ctx, handle);
    fx.assert_no_exception();

    let reaction = fx.reaction(
        "X",
        1.0,
        &[
            ("H+", Phase::Aqueous, 1),
            ("B", Phase::Aqueous, -1),
            ("C", Phase::Aqueous, -1),
        ],
    );
    entry::add_reaction(&bridge, ctx, handle, reaction);
    fx.assert_no_exception();

    entry::solve(&bridge, ctx, handle);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, CORE_EXCEPTION_CLASS);
    assert!(
        thrown
            .message
            .starts_with("chemmisol::TooManyProducedSpeciesInReaction: "),
        "{}",
        thrown.message
    );

    // The last solved state is still in place.
    assert_close(1e-7, entry::concentration(&bridge, ctx, handle, fx.string("H+")));
    assert_close(1e-7, entry::concentration(&bridge, ctx, handle, fx.string("OH-")));
    assert_close(
        1e-14,
        entry::reaction_quotient(&bridge, ctx, handle, fx.string("water")),
    );
    fx.assert_no_exception();
    assert!(entry::concentration(&bridge, ctx, handle, fx.string("B")).is_nan());
    assert!(fx.take_exception().is_some());
}

#[test]
fn test_mineral_component_without_sites() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    entry::add_component(&bridge, &fx.host, handle, fx.component("=SOH", Phase::Mineral, 1.0));

    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, CORE_EXCEPTION_CLASS);
    assert!(thrown
        .message
        .starts_with("chemmisol::InvalidMineralSpeciesWithUndefinedSitesCount: "));

    // The engine is still usable.
    entry::add_component(&bridge, &fx.host, handle, fx.component("Na+", Phase::Aqueous, 0.1));
    entry::solve(&bridge, &fx.host, handle);
    fx.assert_no_exception();
    assert_close(
        0.1,
        entry::concentration(&bridge, &fx.host, handle, fx.string("Na+")),
    );
}

#[test]
fn test_phosphate_equilibrium() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let ctx = &fx.host;
    let handle = entry::allocate(&bridge, ctx);
    let reaction = fx.reaction(
        "H4PO3",
        13.192,
        &[
            ("H4PO3", Phase::Aqueous, -1),
            ("H+", Phase::Aqueous, 4),
            ("PO4-3", Phase::Aqueous, 1),
        ],
    );
    entry::add_reaction(&bridge, ctx, handle, reaction);
    entry::add_component(&bridge, ctx, handle, fx.component("PO4-3", Phase::Aqueous, 0.1));
    entry::fix_ph(&bridge, ctx, handle, 7.5, fx.string("H+"));
    entry::set_up(&bridge, ctx, handle);
    entry::solve(&bridge, ctx, handle);
    fx.assert_no_exception();

    let po4 = entry::concentration(&bridge, ctx, handle, fx.string("PO4-3"));
    let h4po3 = entry::concentration(&bridge, ctx, handle, fx.string("H4PO3"));
    let h = entry::concentration(&bridge, ctx, handle, fx.string("H+"));
    assert_close(10f64.powf(-7.5), h);
    assert_close(0.1, po4 + h4po3);
    assert_close(
        10f64.powf(13.192),
        entry::reaction_quotient(&bridge, ctx, handle, fx.string("H4PO3")),
    );

    entry::set_total_concentration(&bridge, ctx, handle, fx.string("PO4-3"), 0.27);
    entry::solve(&bridge, ctx, handle);
    fx.assert_no_exception();
    let po4 = entry::concentration(&bridge, ctx, handle, fx.string("PO4-3"));
    let h4po3 = entry::concentration(&bridge, ctx, handle, fx.string("H4PO3"));
    assert_close(0.27, po4 + h4po3);
}

#[test]
fn test_mineral_surface_equilibrium() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let ctx = &fx.host;
    let handle = entry::allocate_with_surface_complex(&bridge, ctx, 1.0, 0.5, 5e-3, fx.string("=SOH"));
    fx.assert_no_exception();
    assert_close(2.5e-3, entry::sites_quantity(&bridge, ctx, handle));

    entry::fix_ph(&bridge, ctx, handle, 5.0, fx.string("H+"));
    let reaction = fx.reaction(
        "=SOH2+",
        5.0,
        &[
            ("=SOH", Phase::Mineral, 1),
            ("H+", Phase::Aqueous, 1),
            ("=SOH2+", Phase::Mineral, -1),
        ],
    );
    entry::add_reaction(&bridge, ctx, handle, reaction);
    entry::set_up(&bridge, ctx, handle);
    entry::solve(&bridge, ctx, handle);
    fx.assert_no_exception();

    assert_close(0.5, entry::concentration(&bridge, ctx, handle, fx.string("=SOH")));
    assert_close(0.5, entry::concentration(&bridge, ctx, handle, fx.string("=SOH2+")));
}

#[test]
fn test_mineral_allocation_without_complex() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate_mineral(&bridge, &fx.host, 2.0, 10.0, 1e-5);
    assert_close(2e-4, entry::sites_quantity(&bridge, &fx.host, handle));
    let plain = entry::allocate(&bridge, &fx.host);
    assert_eq!(entry::sites_quantity(&bridge, &fx.host, plain), 0.0);
    fx.assert_no_exception();
}

#[test]
fn test_use_after_dispose_is_rejected() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = water_system(&bridge, &fx);
    entry::dispose(&bridge, &fx.host, handle);
    fx.assert_no_exception();

    let value = entry::concentration(&bridge, &fx.host, handle, fx.string("H+"));
    assert!(value.is_nan());
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/IllegalStateException");

    entry::dispose(&bridge, &fx.host, handle);
    assert!(fx.take_exception().is_some());

    // A new engine may reuse the slot, never the handle.
    let next = entry::allocate(&bridge, &fx.host);
    assert_ne!(next, handle);
    entry::set_up(&bridge, &fx.host, handle);
    assert!(fx.take_exception().is_some());
    assert_eq!(bridge.live_engines(), 1);
}

#[test]
fn test_reagents_are_traversed_once_in_order() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = water_system(&bridge, &fx);
    fx.host.clear_calls();

    add_water_reaction(&bridge, &fx, handle);
    fx.assert_no_exception();
    assert_eq!(fx.host.call_count("getReagents"), 1);
    assert_eq!(fx.host.call_count("iterator"), 1);
    assert_eq!(fx.host.call_count("hasNext"), 4);
    assert_eq!(fx.host.call_count("next"), 3);

    let names: Vec<String> = fx
        .host
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("ummisco/gama/chemmisol/Reagent."))
        .collect();
    assert_eq!(names.len(), 9);
}

#[test]
fn test_missing_accessor_is_a_fault() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    let name = fx.string("Na+");
    let incomplete = fx.host.new_object("ummisco/gama/chemmisol/Incomplete", &[("name", name)]);
    fx.host
        .define_class("ummisco/gama/chemmisol/Incomplete")
        .getter("getName", "()Ljava/lang/String;", "name");

    entry::add_component(&bridge, &fx.host, handle, HostValue::Object(incomplete));
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/NoSuchMethodError");
    assert!(thrown.message.contains("getPhase"), "{}", thrown.message);

    entry::solve(&bridge, &fx.host, handle);
    fx.assert_no_exception();
    assert!(entry::concentration(&bridge, &fx.host, handle, fx.string("Na+")).is_nan());
    assert!(fx.take_exception().is_some());
}

#[test]
fn test_null_arguments() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);

    entry::add_reaction(&bridge, &fx.host, handle, HostValue::Null);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/NullPointerException");

    entry::fix_ph(&bridge, &fx.host, handle, 7.0, HostValue::Null);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/NullPointerException");
}

#[test]
fn test_unknown_names_are_faults() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = water_system(&bridge, &fx);

    entry::set_total_concentration(&bridge, &fx.host, handle, fx.string("Cl-"), 0.1);
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/IllegalStateException");
    assert!(thrown.message.contains("Cl-"));

    assert!(entry::concentration(&bridge, &fx.host, handle, fx.string("Cl-")).is_nan());
    assert!(fx.take_exception().is_some());
    assert!(entry::reaction_quotient(&bridge, &fx.host, handle, fx.string("none")).is_nan());
    assert!(fx.take_exception().is_some());
}

#[test]
fn test_unmapped_phase_constant() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    let gas_name = fx.string("GAS");
    let gas = fx.host.new_object(
        chemmisol_bridge::PHASE_CLASS,
        &[("name", gas_name), ("ordinal", HostValue::Int(3))],
    );
    let component = fx.host.new_object(
        common::COMPONENT_CLASS,
        &[
            ("name", fx.string("CO2")),
            ("phase", HostValue::Object(gas)),
            ("totalConcentration", HostValue::Double(0.1)),
        ],
    );

    entry::add_component(&bridge, &fx.host, handle, HostValue::Object(component));
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/IllegalStateException");
    assert!(thrown.message.contains("GAS"));
}

#[test]
fn test_host_exception_propagates_unchanged() {
    let bridge = Bridge::default();
    let fx = Fixture::new();
    let handle = entry::allocate(&bridge, &fx.host);
    fx.host
        .define_class("ummisco/gama/chemmisol/Throwing")
        .method("getName", "()Ljava/lang/String;", |host, _, _| {
            host.raise("java/lang/IllegalArgumentException", "bad name");
            Ok(HostValue::Null)
        });
    let obj = fx.host.new_object("ummisco/gama/chemmisol/Throwing", &[]);

    entry::add_component(&bridge, &fx.host, handle, HostValue::Object(obj));
    let thrown = fx.take_exception().unwrap();
    assert_eq!(thrown.class, "java/lang/IllegalArgumentException");
    assert_eq!(thrown.message, "bad name");
    assert!(fx.take_exception().is_none());
}
