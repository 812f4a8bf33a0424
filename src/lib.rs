// src/lib.rs
#![crate_type = "lib"]
#![crate_name = "pagemark"]

// Core modules
pub mod application;
pub mod domain;
pub mod infrastructure;

// By-name access to the services
pub mod remote;

// CLI modules
pub mod cli;
pub mod config;
pub mod exitcode;
pub mod util;
