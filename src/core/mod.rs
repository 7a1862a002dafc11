pub mod domain;
pub mod errors;
pub mod traits;
