#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Core business logic for the Taskvault API: domain models, the JWT-based"]
#![doc = "authentication layer (token service, middleware, extractors), the task"]
#![doc = "store/query engine, route handlers, and the shared error and response"]
#![doc = "envelope types. The binary in `main.rs` wires these into an actix-web app."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod routes;
pub mod store;
