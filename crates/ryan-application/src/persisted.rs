//! Result of an operation whose in-memory outcome survives a failed save.

use ryan_core::RyanError;

/// A value plus the error, if any, from writing it to the store.
///
/// The value is always the up-to-date state; `storage_error` is a
/// non-blocking warning for the caller to surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<T> {
    pub value: T,
    pub storage_error: Option<RyanError>,
}

impl<T> Persisted<T> {
    pub fn saved(value: T) -> Self {
        Self {
            value,
            storage_error: None,
        }
    }

    pub fn unsaved(value: T, error: RyanError) -> Self {
        Self {
            value,
            storage_error: Some(error),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.storage_error.is_none()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Persisted<U> {
        Persisted {
            value: f(self.value),
            storage_error: self.storage_error,
        }
    }
}
