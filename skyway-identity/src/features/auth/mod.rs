pub mod generate_token;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod validate_token;

pub use generate_token::{GenerateToken, GenerateTokenHandler, TokenSettings};
pub use login::{Login, LoginHandler};
pub use logout::{Logout, LogoutHandler};
pub use refresh_token::{RefreshToken, RefreshTokenHandler};
pub use validate_token::{ValidateToken, ValidateTokenHandler};
