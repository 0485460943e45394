pub mod handlers;
pub mod leetcode_client;
pub mod models;
pub mod routes;

pub use leetcode_client::{LeetCodeClient, ProfileSource};
