//! # Ports Layer
//!
//! Driving interface of node translation.

pub mod inbound;

pub use inbound::NodeTranslationApi;
