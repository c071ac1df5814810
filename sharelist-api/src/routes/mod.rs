/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, session probe
/// - `lists`: List CRUD
/// - `items`: Item CRUD within a list
/// - `members`: List membership management

pub mod auth;
pub mod health;
pub mod items;
pub mod lists;
pub mod members;
