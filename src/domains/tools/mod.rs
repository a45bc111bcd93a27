//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Each tool wraps one ABP REST operation, or answers from built-in
//! reference data.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool groups, one file per ABP area
//! - `handlers.rs` - `ToolDefinition`, execution context and output envelope
//! - `registry.rs` - Merges the groups into one name-keyed table
//! - `mode.rs` - Mode gate deciding which tools are reachable
//! - `hybrid.rs` - Remote-with-fallback execution for hybrid tools
//! - `router.rs` - Dispatch of `tools/list` and `tools/call`
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a params struct and a `ToolDefinition` to the group's `tools()`
//! 2. Pick its `Access`: `Credential`, `Public` or `Hybrid`
//!
//! The registry, the mode gate and both transports pick it up from there.

pub mod definitions;
mod error;
mod handlers;
mod hybrid;
mod mode;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::{
    ExecutionMode, ToolContext, ToolCounts, ToolDefinition, ToolOutput, ToolResult, error_result,
};
pub use hybrid::run_hybrid;
pub use mode::{Access, Mode, filter_visible};
pub use registry::{ToolRegistry, build_registry};
pub use router::ToolDispatcher;
