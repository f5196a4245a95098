//! Authentication: JWT access/refresh tokens and argon2 password hashes

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenType};
pub use middleware::AuthUser;
pub use password::PasswordService;
