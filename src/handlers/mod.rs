pub mod admin;
pub mod book;
pub mod health;
