pub mod deck;
pub mod error;
pub mod stats;
pub mod store;
pub mod study;
