//! Relations between entities

pub mod siblings;

pub use siblings::Siblings;
