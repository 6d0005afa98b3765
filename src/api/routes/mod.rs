//! API Routes
//!
//! Route handlers organized by resource.

pub mod entries;
pub mod health;
pub mod insights;
