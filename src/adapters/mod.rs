// Adapters layer: concrete implementations of the domain ports.

pub mod json_repository;

pub use json_repository::JsonRepository;
