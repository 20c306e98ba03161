//! # Error Types
//!
//! The error taxonomy shared by every coordination subsystem.
//!
//! Administrative callers match on the variant, so each failure class keeps
//! its own kind: "route not yours to enable" (`RouteNotAdvertised`) must stay
//! distinguishable from "malformed input" (`InvalidRoute`) and from
//! "machine unknown" (`NotFound`).

use thiserror::Error;

/// Result alias used by every port and service.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised by the coordination core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A machine, namespace or credential lookup missed.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record that was looked up ("machine", "namespace", ...).
        entity: &'static str,
        /// The lookup key, rendered for diagnostics.
        key: String,
    },

    /// Registration attempted for a machine that is already registered.
    #[error("machine already registered: {0}")]
    AlreadyRegistered(String),

    /// Key material could not be parsed or is unknown.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A route string is not a valid address prefix.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// Enable request for a prefix the machine does not advertise.
    #[error("route {route} is not advertised by machine {machine}")]
    RouteNotAdvertised {
        /// The offending prefix.
        route: String,
        /// Name of the machine the request targeted.
        machine: String,
    },

    /// A stored JSON column could not be decoded.
    #[error("failed to decode {field}: {reason}")]
    DecodeFailure {
        /// Column that failed to decode.
        field: &'static str,
        /// Decoder message.
        reason: String,
    },

    /// The stored overlay address cannot form a host prefix.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The sharing collaborator had nothing to detach for this machine.
    #[error("machine {0} is not shared with any namespace")]
    NotShared(u64),

    /// No free overlay address is left in the configured prefix.
    #[error("no free address left in {0}")]
    AddressExhausted(String),

    /// Opaque backing-store failure.
    #[error("store failure: {0}")]
    StoreFailure(String),
}

impl MeshError {
    /// Shorthand for a machine lookup miss.
    pub fn machine_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "machine",
            key: key.to_string(),
        }
    }

    /// Shorthand for a namespace lookup miss.
    pub fn namespace_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            entity: "namespace",
            key: key.to_string(),
        }
    }

    /// Whether this is a lookup miss of any kind.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
