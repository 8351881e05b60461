// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Blankfill service.
//!
//! Exposes the lifecycle controller over a small REST API guarded by HS256
//! bearer tokens, plus an unauthenticated health probe.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod jwt;
pub mod server;

pub use auth::AuthState;
pub use error::ApiError;
pub use jwt::{JwtError, JwtFactory, JwtVerifier};
pub use server::{GatewayState, ServerConfig, router, start_server};
