//! Persistence layer: sqlx queries against the shared Postgres pool.
//!
//! `users` is the credential store, `tasks` the task store plus the
//! filter/sort/pagination query engine. The pool is always passed in, never
//! held globally, so tests can substitute their own.

pub mod tasks;
pub mod users;
