//! CrudService: generic CRUD over a record store, plus request validation.

mod crud;
mod validation;
pub use crud::{CrudService, Deleted};
pub use validation::RequestValidator;
