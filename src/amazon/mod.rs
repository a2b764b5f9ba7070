//! Amazon-specific modules: HTTP client, cookie session, parsing and records.

pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod selectors;
pub mod session;

pub use client::{AmazonClient, AmazonPages};
pub use models::{Price, Product, ProductDetails, Rating, ReviewPage, ReviewRecord};
pub use parser::Parser;
pub use regions::Region;
pub use session::SessionStore;
