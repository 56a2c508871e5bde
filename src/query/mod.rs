// Query module - handles named parameter rewriting
pub mod named;

pub use named::NamedQuery;
