pub mod config;
pub mod debt;
pub mod filter;
pub mod project;
pub mod user;

pub use config::*;
pub use debt::*;
pub use filter::*;
pub use project::*;
pub use user::*;
