//! Scene session host for the tabletop.
//!
//! DESIGN
//! ======
//! The `scene` crate is a pure, synchronous interaction engine: it answers
//! every input event with a list of actions. This crate owns one engine per
//! active scene ([`session::SceneSession`]), feeds it data from the external
//! collaborators ([`store`]), and carries out the actions it returns:
//! committed token moves, removals and pings become store calls.
//!
//! Store calls are awaited one at a time in the order the engine emitted
//! them. A failed call is logged and counted; local state is never rolled
//! back, because the store's broadcast is the eventual source of truth.

pub mod config;
pub mod session;
pub mod store;

pub use scene;

/// Install the default `tracing` fmt subscriber for hosts that have none.
///
/// Returns `false` when a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt().try_init().is_ok()
}
