//! # Ports Layer
//!
//! Inbound (driving) and outbound (driven) interfaces.

pub mod inbound;
pub mod outbound;

pub use inbound::{PeerResolutionApi, StalenessApi};
pub use outbound::ChangeEventSource;
