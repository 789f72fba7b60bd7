pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use domain::{AgeDistribution, AppError, RawRecord, Result, UserEntity};
