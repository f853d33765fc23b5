pub mod middleware;
pub mod tokens;

pub use middleware::{SessionToken, auth_middleware};
pub use tokens::TokenKeys;
