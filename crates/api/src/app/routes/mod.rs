pub mod admin;
pub mod employees;
pub mod manage;
pub mod session;
