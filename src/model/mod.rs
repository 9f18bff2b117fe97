pub mod catalog;
pub mod role;
pub mod statistics;
pub mod user;
