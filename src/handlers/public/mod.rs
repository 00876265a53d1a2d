// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition only. Every input is untrusted, so bodies go through
// `ValidJson` before reaching a service.
//
// Security Level: None
// Middleware: None

pub mod auth; // POST /auth/signup, POST /auth/signin
