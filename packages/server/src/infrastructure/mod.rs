//! Infrastructure layer: concrete implementations of the domain contracts.

pub mod directory;
pub mod dto;
pub mod registry;
