//! Host-facing entry points
//!
//! One function per native method of the host `ChemicalSystem` class. Each
//! opens a [`BridgeSession`] on the host context of the call, converts its
//! arguments, runs the operation on the [`Bridge`] and hands any failure to
//! [`boundary`], which raises the host exception and returns the fallback.
//!
//! Handle lifecycle: `allocate*` → add/fix/set → `set_up` → `solve`, queries
//! at any point, `dispose` last. A handle is stale after `dispose` and every
//! later use raises instead of touching freed memory.

use chemmisol_sdk::{HostContext, HostValue};

use crate::bridge::Bridge;
use crate::exception::boundary;
use crate::session::BridgeSession;

/// Handle returned when allocation fails
pub const NULL_HANDLE: i64 = 0;

/// `static long allocate()`
pub fn allocate(bridge: &Bridge, ctx: &dyn HostContext) -> i64 {
    boundary(ctx, "allocate", NULL_HANDLE, || Ok(bridge.allocate()))
}

/// `static long allocate(double, double, double)`
pub fn allocate_mineral(
    bridge: &Bridge,
    ctx: &dyn HostContext,
    solid_concentration: f64,
    specific_surface_area: f64,
    site_concentration: f64,
) -> i64 {
    boundary(ctx, "allocate", NULL_HANDLE, || {
        Ok(bridge.allocate_mineral(
            solid_concentration,
            specific_surface_area,
            site_concentration,
        ))
    })
}

/// `static long allocate(double, double, double, String)`
pub fn allocate_with_surface_complex(
    bridge: &Bridge,
    ctx: &dyn HostContext,
    solid_concentration: f64,
    specific_surface_area: f64,
    site_concentration: f64,
    surface_complex: HostValue,
) -> i64 {
    boundary(ctx, "allocate", NULL_HANDLE, || {
        let session = BridgeSession::new(ctx);
        let surface_complex = session.string(surface_complex)?;
        bridge.allocate_with_surface_complex(
            solid_concentration,
            specific_surface_area,
            site_concentration,
            &surface_complex,
        )
    })
}

/// `static void dispose(long)`
pub fn dispose(bridge: &Bridge, ctx: &dyn HostContext, handle: i64) {
    boundary(ctx, "dispose", (), || bridge.dispose(handle))
}

/// `static void addReaction(long, Reaction)`
pub fn add_reaction(bridge: &Bridge, ctx: &dyn HostContext, handle: i64, reaction: HostValue) {
    boundary(ctx, "addReaction", (), || {
        let session = BridgeSession::new(ctx);
        let reaction = session.reaction(reaction)?;
        bridge.add_reaction(handle, &reaction)
    })
}

/// `static void addComponent(long, ChemicalComponent)`
pub fn add_component(bridge: &Bridge, ctx: &dyn HostContext, handle: i64, component: HostValue) {
    boundary(ctx, "addComponent", (), || {
        let session = BridgeSession::new(ctx);
        let component = session.component(component)?;
        bridge.add_component(handle, &component)
    })
}

/// `static void fixPH(long, double, String)`
pub fn fix_ph(bridge: &Bridge, ctx: &dyn HostContext, handle: i64, ph: f64, h_component: HostValue) {
    boundary(ctx, "fixPH", (), || {
        let session = BridgeSession::new(ctx);
        let h_component = session.string(h_component)?;
        bridge.fix_ph(handle, ph, &h_component)
    })
}

/// `static void setTotalConcentration(long, String, double)`
pub fn set_total_concentration(
    bridge: &Bridge,
    ctx: &dyn HostContext,
    handle: i64,
    component: HostValue,
    concentration: f64,
) {
    boundary(ctx, "setTotalConcentration", (), || {
        let session = BridgeSession::new(ctx);
        let component = session.string(component)?;
        bridge.set_total_concentration(handle, &component, concentration)
    })
}

/// `static void setUp(long)`
pub fn set_up(bridge: &Bridge, ctx: &dyn HostContext, handle: i64) {
    boundary(ctx, "setUp", (), || bridge.set_up(handle))
}

/// `static void solve(long)`
pub fn solve(bridge: &Bridge, ctx: &dyn HostContext, handle: i64) {
    boundary(ctx, "solve", (), || bridge.solve(handle).map(|_| ()))
}

/// `static double concentration(long, String)`
pub fn concentration(bridge: &Bridge, ctx: &dyn HostContext, handle: i64, species: HostValue) -> f64 {
    boundary(ctx, "concentration", f64::NAN, || {
        let session = BridgeSession::new(ctx);
        let species = session.string(species)?;
        bridge.concentration(handle, &species)
    })
}

/// `static double reactionQuotient(long, String)`
pub fn reaction_quotient(bridge: &Bridge, ctx: &dyn HostContext, handle: i64, reaction: HostValue) -> f64 {
    boundary(ctx, "reactionQuotient", f64::NAN, || {
        let session = BridgeSession::new(ctx);
        let reaction = session.string(reaction)?;
        bridge.reaction_quotient(handle, &reaction)
    })
}

/// `static double sitesQuantity(long)`
pub fn sites_quantity(bridge: &Bridge, ctx: &dyn HostContext, handle: i64) -> f64 {
    boundary(ctx, "sitesQuantity", f64::NAN, || bridge.sites_quantity(handle))
}
