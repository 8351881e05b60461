// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Blankfill service.
//!
//! This crate provides the request data model, the input validation rules,
//! the shared error type, and the adapter traits that storage and inference
//! backends implement.

pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use error::BlankfillError;
pub use types::{
    AdapterType, HealthStatus, NewRequest, Page, PageRequest, RequestRecord, RequestStatus,
    SearchFilter,
};

pub use traits::{InferenceAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(BlankfillError::Validation("bad".into()).is_client_error());
        assert!(BlankfillError::NotFound { id: "x".into() }.is_client_error());
        assert!(!BlankfillError::Internal("boom".into()).is_client_error());
        assert!(
            !BlankfillError::UnexpectedStore {
                source: Box::new(std::io::Error::other("disk full")),
            }
            .is_client_error()
        );
    }

    #[test]
    fn not_found_message_names_the_request() {
        let err = BlankfillError::NotFound {
            id: "does-not-exist".into(),
        };
        assert_eq!(err.to_string(), "request does-not-exist does not exist");
    }

    #[test]
    fn invalid_transition_message_uses_status_names() {
        let err = BlankfillError::InvalidTransition {
            id: "abc".into(),
            from: RequestStatus::Completed,
            to: RequestStatus::Running,
        };
        assert_eq!(err.to_string(), "request abc cannot move from COMPLETED to RUNNING");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_inference_adapter<T: InferenceAdapter>() {}
        fn _assert_object_safe(_: &dyn StorageAdapter, _: &dyn InferenceAdapter) {}
    }
}
