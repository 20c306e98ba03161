//! # Application Layer
//!
//! Services orchestrating the domain rules over the outbound ports.

pub mod context;
pub mod registry;
pub mod routes;

pub use context::RegistryContext;
pub use registry::MachineRegistry;
pub use routes::RouteAuthority;
