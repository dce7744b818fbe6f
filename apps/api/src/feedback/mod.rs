//! Feedback — contracts, prompts, schemas, service, and route handlers for
//! translation and essay evaluation.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod schema;
pub mod service;
