//! Domain logic, organized by bounded context.

pub mod tools;
