// handlers/mod.rs - Handlers grouped by security tier
//
// Public (no auth) → Protected (JWT auth + user still exists)
pub mod public;    // No authentication required (/auth/*)
pub mod protected; // Bearer token required (/users/*, /bookmarks/*)
