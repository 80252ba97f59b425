pub mod entities;
pub mod requests;
pub mod responses;

pub use requests::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
pub use responses::{LoginResponse, RefreshTokenResponse};
