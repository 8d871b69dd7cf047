//! Employees domain module (profiles and the directory store).
//!
//! This crate holds the employee records that the access-control layer's
//! ownership checks point at. The richer HR data behind the employee tabs
//! (payroll amounts, documents, schedules) lives with the page handlers and
//! is out of scope here.

pub mod directory;
pub mod profile;

pub use directory::{EmployeeDirectory, InMemoryDirectory};
pub use profile::{Department, EmployeeProfile, EmployeeStatus, EmploymentType, NewEmployee};
