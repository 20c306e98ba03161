//! # Domain Layer
//!
//! Output shapes of translation.

pub mod node;
pub mod views;

pub use node::{derp_hint, Node, CAPABILITY_FILE_SHARING, DERP_MAGIC_IP};
pub use views::{MachineView, NamespaceView, PreAuthKeyView, RoutesView};
