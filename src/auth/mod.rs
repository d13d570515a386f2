pub mod password;
pub mod role;
pub mod token;

pub use role::Role;
pub use token::{Claims, TokenError};
