// Outer surfaces: HTTP trigger and environment info.

pub mod env_info;
pub mod http_api;
