#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use tracing_subscriber as _;

pub mod artifacts;
pub mod cli;
pub mod command;
pub mod compose;
pub mod deployer;
pub mod error;
pub mod jwt;
pub mod l1;
pub mod l2;
pub mod paths;
pub mod readiness;
pub mod rpc;
pub mod runner;
pub mod verify;

pub use cli::DevnetArgs;
pub use error::DevnetError;
pub use paths::DevnetPaths;
