pub mod distribution;
pub mod error;
pub mod record;
pub mod user;

pub use distribution::AgeDistribution;
pub use error::{AppError, Result};
pub use record::RawRecord;
pub use user::UserEntity;
