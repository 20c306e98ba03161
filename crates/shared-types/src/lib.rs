//! # Shared Types Crate
//!
//! Domain records and the error taxonomy shared by every coordination
//! subsystem (machine registry, peer resolution, node translation).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: machine, namespace and sharing records are
//!   defined once here and consumed by reference everywhere else.
//! - **Typed Columns**: semi-structured client data stays JSON text at rest
//!   but is only reachable through `JsonColumn<T>::decode`.
//! - **Specific Failures**: every fallible operation returns `MeshError`,
//!   whose variants map one-to-one onto what an operator can act on.

pub mod entities;
pub mod errors;
pub mod host_info;
pub mod json_column;
pub mod keys;
pub mod routes;

pub use entities::*;
pub use errors::*;
pub use host_info::{HostInfo, NetInfo, Service};
pub use json_column::JsonColumn;
pub use keys::{DiscoKey, MachineKey, NodeKey, KEY_LEN};
pub use routes::{parse_route, routes_to_strings};
