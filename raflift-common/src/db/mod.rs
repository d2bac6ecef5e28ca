//! Database models and queries

pub mod audit;
pub mod coefficients;
pub mod init;
pub mod models;
pub mod users;

pub use audit::*;
pub use coefficients::*;
pub use init::*;
pub use models::*;
pub use users::*;
