//! # MC-03 Node Translation
//!
//! Turns stored machine records into what leaves the control plane: the wire
//! node descriptor clients receive in their network map, and the
//! administrative transfer objects of the management API.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Naming
//!
//! | DNS proxied | Advertised name |
//! |-------------|-----------------|
//! | yes | `name.namespace.base_domain` |
//! | no / unset | `name` |
//!
//! ## Module Structure
//!
//! ```text
//! mc-03-node-translation/
//! ├── config.rs        # TranslationContext, DnsConfig
//! ├── domain/          # Node, MachineView, RoutesView
//! ├── ports/           # NodeTranslationApi
//! └── application/     # to_node, to_nodes, NodeTranslator
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::{node_name, to_node, to_nodes, NodeTranslator};
pub use config::{DnsConfig, TranslationContext};
pub use domain::{
    derp_hint, MachineView, NamespaceView, Node, PreAuthKeyView, RoutesView,
    CAPABILITY_FILE_SHARING, DERP_MAGIC_IP,
};
pub use ports::NodeTranslationApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
