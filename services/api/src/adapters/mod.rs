pub mod db;
pub mod password;
pub mod token;

pub use db::DbAdapter;
pub use password::Pbkdf2Hasher;
pub use token::JwtTokenService;
