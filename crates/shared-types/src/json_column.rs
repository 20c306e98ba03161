//! # Typed JSON Columns
//!
//! Semi-structured client data (host metadata, observed endpoints, enabled
//! routes) is persisted as JSON text so the protocol can evolve without schema
//! migrations. `JsonColumn<T>` keeps the stored text but only ever hands out
//! a decoded `T`.
//!
//! Empty text and `null` both decode to `T::default()`. Anything else that is
//! not valid JSON for `T` is a `DecodeFailure`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

use crate::errors::{MeshError, MeshResult};

/// JSON text stored for a column of type `T`.
pub struct JsonColumn<T> {
    raw: String,
    _column: PhantomData<fn() -> T>,
}

impl<T> JsonColumn<T> {
    /// An absent column.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_raw(String::new())
    }

    /// Wrap text exactly as read from the store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            _column: PhantomData,
        }
    }

    /// The stored text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

impl<T: Serialize> JsonColumn<T> {
    /// Encode a value for storage.
    pub fn encode(value: &T, field: &'static str) -> MeshResult<Self> {
        serde_json::to_string(value)
            .map(Self::from_raw)
            .map_err(|e| MeshError::DecodeFailure {
                field,
                reason: e.to_string(),
            })
    }
}

impl<T: DeserializeOwned + Default> JsonColumn<T> {
    /// Decode the stored text, naming `field` on failure.
    pub fn decode(&self, field: &'static str) -> MeshResult<T> {
        let text = self.raw.trim();
        if text.is_empty() || text == "null" {
            return Ok(T::default());
        }
        serde_json::from_str(text).map_err(|e| MeshError::DecodeFailure {
            field,
            reason: e.to_string(),
        })
    }
}

impl<T> Default for JsonColumn<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Clone for JsonColumn<T> {
    fn clone(&self) -> Self {
        Self::from_raw(self.raw.clone())
    }
}

impl<T> PartialEq for JsonColumn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for JsonColumn<T> {}

impl<T> fmt::Debug for JsonColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JsonColumn").field(&self.raw).finish()
    }
}
