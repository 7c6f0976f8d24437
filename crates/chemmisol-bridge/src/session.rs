//! Per-call view of the host
//!
//! A session is opened by each entry point for the host context it received
//! and dropped when the call returns. It converts host arguments into native
//! values and descriptors.

use chemmisol_sdk::{FromHost, HostContext, HostObject, HostValue};
use once_cell::unsync::OnceCell;

use crate::descriptor::{HostComponent, HostReaction};
use crate::error::BridgeResult;
use crate::phase::PhaseTable;

/// Host context of one entry point call
pub struct BridgeSession<'a> {
    ctx: &'a dyn HostContext,
    phases: OnceCell<&'static PhaseTable>,
}

impl<'a> BridgeSession<'a> {
    /// Open a session on the host context of the current call
    pub fn new(ctx: &'a dyn HostContext) -> Self {
        Self {
            ctx,
            phases: OnceCell::new(),
        }
    }

    /// The process-wide phase table, resolved on first need
    pub fn phases(&self) -> BridgeResult<&'static PhaseTable> {
        self.phases
            .get_or_try_init(|| PhaseTable::global(self.ctx))
            .copied()
    }

    /// Copy a host string argument
    pub fn string(&self, value: HostValue) -> BridgeResult<String> {
        Ok(String::from_host(self.ctx, value)?)
    }

    /// Bind a non-null host object argument
    pub fn object(&self, value: HostValue) -> BridgeResult<HostObject<'a>> {
        Ok(HostObject::wrap(self.ctx, value)?)
    }

    /// Read a host `Reaction` argument through its accessors
    pub fn reaction(&self, value: HostValue) -> BridgeResult<HostReaction<'a>> {
        let obj = self.object(value)?;
        Ok(HostReaction::new(obj, self.phases()?))
    }

    /// Read a host `ChemicalComponent` argument through its accessors
    pub fn component(&self, value: HostValue) -> BridgeResult<HostComponent<'a>> {
        let obj = self.object(value)?;
        Ok(HostComponent::new(obj, self.phases()?))
    }
}
