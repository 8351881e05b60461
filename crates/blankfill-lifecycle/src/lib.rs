// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request lifecycle orchestration for Blankfill.
//!
//! The [`RequestController`] is built once at startup from a storage adapter
//! and an inference adapter, then shared by reference with the HTTP layer.

pub mod controller;

pub use controller::RequestController;
