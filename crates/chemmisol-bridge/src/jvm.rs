//! JNI exports of the native methods of `ummisco.gama.chemmisol.ChemicalSystem`
//!
//! Every export wraps its `JNIEnv` in a [`JniContext`] and forwards to the
//! matching function of [`crate::entry`] on the process-wide [`Bridge`].

use std::os::raw::c_void;

use chemmisol_sdk::JniContext;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jdouble, jint, jlong, JavaVM, JNI_VERSION_1_8};
use jni::JNIEnv;

use crate::bridge::Bridge;
use crate::{entry, logging};

/// Called by the JVM when the library is loaded
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    logging::init();
    JNI_VERSION_1_8
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_allocate__<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jlong {
    let ctx = JniContext::new(env);
    entry::allocate(Bridge::global(), &ctx)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_allocate__DDD<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    solid_concentration: jdouble,
    specific_surface_area: jdouble,
    site_concentration: jdouble,
) -> jlong {
    let ctx = JniContext::new(env);
    entry::allocate_mineral(
        Bridge::global(),
        &ctx,
        solid_concentration,
        specific_surface_area,
        site_concentration,
    )
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_allocate__DDDLjava_lang_String_2<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    solid_concentration: jdouble,
    specific_surface_area: jdouble,
    site_concentration: jdouble,
    surface_complex: JString<'local>,
) -> jlong {
    let ctx = JniContext::new(env);
    let surface_complex = ctx.adopt_string(surface_complex);
    entry::allocate_with_surface_complex(
        Bridge::global(),
        &ctx,
        solid_concentration,
        specific_surface_area,
        site_concentration,
        surface_complex,
    )
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_dispose<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) {
    let ctx = JniContext::new(env);
    entry::dispose(Bridge::global(), &ctx, handle)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_addReaction<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    reaction: JObject<'local>,
) {
    let ctx = JniContext::new(env);
    let reaction = ctx.adopt(reaction);
    entry::add_reaction(Bridge::global(), &ctx, handle, reaction)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_addComponent<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    component: JObject<'local>,
) {
    let ctx = JniContext::new(env);
    let component = ctx.adopt(component);
    entry::add_component(Bridge::global(), &ctx, handle, component)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_fixPH<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    ph: jdouble,
    h_component: JString<'local>,
) {
    let ctx = JniContext::new(env);
    let h_component = ctx.adopt_string(h_component);
    entry::fix_ph(Bridge::global(), &ctx, handle, ph, h_component)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_setTotalConcentration<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    component: JString<'local>,
    concentration: jdouble,
) {
    let ctx = JniContext::new(env);
    let component = ctx.adopt_string(component);
    entry::set_total_concentration(Bridge::global(), &ctx, handle, component, concentration)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_setUp<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) {
    let ctx = JniContext::new(env);
    entry::set_up(Bridge::global(), &ctx, handle)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_solve<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) {
    let ctx = JniContext::new(env);
    entry::solve(Bridge::global(), &ctx, handle)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_concentration<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    species: JString<'local>,
) -> jdouble {
    let ctx = JniContext::new(env);
    let species = ctx.adopt_string(species);
    entry::concentration(Bridge::global(), &ctx, handle, species)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_reactionQuotient<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    reaction: JString<'local>,
) -> jdouble {
    let ctx = JniContext::new(env);
    let reaction = ctx.adopt_string(reaction);
    entry::reaction_quotient(Bridge::global(), &ctx, handle, reaction)
}

#[no_mangle]
pub extern "system" fn Java_ummisco_gama_chemmisol_ChemicalSystem_sitesQuantity<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
) -> jdouble {
    let ctx = JniContext::new(env);
    entry::sites_quantity(Bridge::global(), &ctx, handle)
}
