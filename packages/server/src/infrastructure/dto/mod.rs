//! Data Transfer Objects (DTOs) for the HTTP diagnostics API.

pub mod http;
