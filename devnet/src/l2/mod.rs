//! L2 rollup stack: genesis generation and service bring-up.

pub mod genesis;
pub mod stack;

pub use genesis::generate_l2_genesis;
pub use stack::{BringUpOptions, bring_up};
