pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod role;
pub mod user;
