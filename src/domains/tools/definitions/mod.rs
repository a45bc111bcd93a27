//! Tool definitions, one module per ABP management area.
//!
//! Each module exposes `tools()`, returning the definitions of its group.

pub mod common;

pub mod applications;
pub mod audit_logs;
pub mod background_jobs;
pub mod docs;
pub mod entities;
pub mod identity;
pub mod localization;
pub mod modules;
pub mod permissions;
pub mod suite;
pub mod tenants;
pub mod ui;
