pub mod banner;
pub mod common;

pub use banner::*;
pub use common::*;
