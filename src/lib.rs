//! Gas flow rate from orifice meter chart readings.
//!
//! [`compute`] turns the eleven field readings and gas properties of an
//! [`Inputs`] record into the sixteen terms of [`Outputs`], ending in the
//! gas flow rate. The remaining modules are the glue the `calcgas` binary
//! puts around it: presets, saved inputs, debounced recalculation and
//! report tables.

pub mod orifice;
pub mod overlay;
pub mod presets;
pub mod report;
pub mod store;
pub mod supercompressibility;
pub mod watch;

pub use orifice::{compute, Inputs, Outputs};
