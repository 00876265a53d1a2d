// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Middleware stack applied to every route in this tier:
//   jwt_auth_middleware      → verifies the token, inserts `AuthUser`
//   validate_user_middleware → loads the user row, inserts `ValidatedUser`
//
// Handlers take the owner from `AuthUser`; they never read a user id from
// the path or body.

pub mod bookmarks; // /bookmarks, /bookmarks/:id
pub mod users;     // /users/me, /users
