pub mod auth;
pub mod catalog;
pub mod schedule;
