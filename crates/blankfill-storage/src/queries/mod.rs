// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for request persistence.

pub mod requests;
pub mod search;
