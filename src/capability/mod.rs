//! Capability probing, decoupled from the components that use the
//! capabilities. Consumed once at startup; a missing capability for the
//! selected engine is fatal before any output-directory state is touched.

mod probe;

pub use probe::{CapabilityReport, probe};
