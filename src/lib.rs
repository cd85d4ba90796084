//! PantryChef backend: recipe discovery over a generative model, with an
//! ingredient catalog, search history, and favorites persisted as flat JSON
//! documents.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod gemini;
pub mod models;
pub mod recipes;
pub mod server;
pub mod store;
