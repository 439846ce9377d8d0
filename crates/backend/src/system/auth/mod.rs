pub mod extractor;
pub mod jwt;
pub mod login_attempts;
pub mod middleware;
pub mod password;
