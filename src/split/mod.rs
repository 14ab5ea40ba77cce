//! # Multi-Carrier Split and Reassembly
//!
//! Spreads one payload over several cover images and reconstructs it.
//!
//! ## Modules
//!
//! - [`plan`]: greedy, deterministic partition of the payload over carrier capacities
//! - [`orchestrator`]: runs capacity estimation, planning and the codec per carrier
//! - [`reassemble`]: order-preserving concatenation of extracted chunks
//!
//! Carrier order is the only thing tying chunks together. Decode must receive
//! the result images in the order encode produced them.

pub mod orchestrator;
pub mod plan;
pub mod reassemble;

pub use orchestrator::{Carrier, MultiCarrier};
pub use plan::{plan, ChunkAssignment, EncodingPlan};
pub use reassemble::concatenate;
