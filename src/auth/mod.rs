pub mod extractors;
pub mod jwt;
pub mod password;

pub use extractors::{AdminOnly, AnyRole, Authorized, Principal};
pub use jwt::{Claims, JwtKeys};
