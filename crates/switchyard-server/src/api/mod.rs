//! REST route layer: thin handlers that call the state store and, on a
//! successful save, ask the bus to emit the matching change event.

pub mod errors;
pub mod state;
