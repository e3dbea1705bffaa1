//! API Routes
//!
//! Route handlers organized by functionality.

pub mod catalog;
pub mod entries;
pub mod export;
pub mod health;
pub mod history;
pub mod insights;
