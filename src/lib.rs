// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Search Agent Server - agent API behind a bearer-token gate
//!
//! Every request is classified by path; requests to protected paths must carry
//! an HS256 JWT signed with the process-wide secret. The verified caller is
//! attached to the request before it reaches the agent runtime.
//!
//! ## Modules
//!
//! - `api` - HTTP router and handlers (Axum)
//! - `auth` - Path classification, token verification, the gate middleware
//! - `agent` - Seam to the external agent runtime
//! - `config` - Environment-driven startup configuration

pub mod agent;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
