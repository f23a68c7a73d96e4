//! Shared utilities and common types for the marketplace backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, API key prefixes)
//! - Server-side code generation (discount codes, booking references)
//! - Cursor-based pagination
//! - Common validation logic

pub mod codes;
pub mod crypto;
pub mod pagination;
pub mod validation;
