//! # Application Layer
//!
//! Translation services.

pub mod translator;

pub use translator::{node_name, to_node, to_nodes, NodeTranslator};
