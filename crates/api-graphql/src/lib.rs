//! GraphQL API Layer
//!
//! Assembles an executable schema from externally supplied SDL files plus
//! built-in AWS scalar definitions, binds declared root fields to the
//! script bridge, and serves the result over HTTP.

pub mod resolver;
pub mod scalars;
pub mod schema;
pub mod sdl;
pub mod server;

pub use schema::{build_schema, FieldBindings};
pub use sdl::load_type_defs;
pub use server::{router, serve};
