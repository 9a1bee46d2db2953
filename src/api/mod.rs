//! API handlers for Biblion REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod people;
pub mod stats;
