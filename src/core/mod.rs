/*!
 * Core Module
 * Shared types and system-wide limits
 */

pub mod limits;
pub mod types;

pub use types::*;
