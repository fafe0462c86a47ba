//! Adapters for external services

pub mod config;
pub mod db;
pub mod email;
