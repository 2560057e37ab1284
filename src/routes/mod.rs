/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. Access control is applied explicitly
/// at the module level (via Axum layers), preventing accidental exposure of
/// protected endpoints.

/// Routes accessible to all clients (anonymous, read-only plus the public
/// submission intake and the Auth Gate itself).
pub mod public;

/// Routes restricted to the authenticated admin.
/// Protected by the `AdminUser` credential middleware.
pub mod admin;
