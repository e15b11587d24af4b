//! External L1 chain: PoS devnet bring-up and genesis allocs.

pub mod genesis;
pub mod stack;

pub use genesis::generate_l1_allocs;
pub use stack::EthPosStack;
