//! faasctl: deploy applications to a Function-as-a-Service platform
//!
//! Layers, innermost first:
//! - `domain`: deployments, plans, env vars, packages
//! - `application`: startup, deploy and deployment services
//! - `infrastructure`: filesystem, terminal and HTTP boundaries, DI container
//! - `cli`: arguments, dispatch, exit codes

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
