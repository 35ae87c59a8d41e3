pub mod gate;
pub mod password;
pub mod role;
pub mod token;
pub mod user;
pub mod verification;
