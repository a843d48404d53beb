pub mod account;
pub mod tasks;

pub use account::*;
pub use tasks::*;
