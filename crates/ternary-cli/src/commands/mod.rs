//! Command implementations.

pub mod batch;
pub mod config;
pub mod evaluate;

pub use self::batch::execute_batch;
pub use self::config::execute_config;
pub use self::evaluate::execute_evaluate;
