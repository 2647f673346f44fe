// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Campaign Server - Account & Campaign Management Service
//!
//! This crate provides an HTTP API for account registration and sign-in,
//! and campaign records that are only ever visible to the user who created
//! them.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer token issuance, verification and request guard
//! - `services` - Credential and owner-scoped campaign services
//! - `storage` - Document store (redb or in-memory) and repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
