pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod queries;
pub mod report;
pub mod runner;
pub mod schema;
pub mod seed;
