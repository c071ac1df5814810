/// Database models and repository functions
///
/// Each model owns the SQL for its table and returns plain records;
/// associations are expressed as explicit join queries rather than relation
/// traversal.
///
/// # Models
///
/// - `user`: accounts with the token-version session counter
/// - `list`: shared to-do lists, owned by their creator
/// - `membership`: (list, user) association rows
/// - `item`: to-do entries within a list

pub mod item;
pub mod list;
pub mod membership;
pub mod user;
