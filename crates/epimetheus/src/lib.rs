//! Top-level facade crate for epimetheus.
//!
//! Re-exports core types and the agent library so users can depend on a single crate.

pub mod core {
    pub use epimetheus_core::*;
}

pub mod agent {
    pub use epimetheus_agent::*;
}
