pub mod app;
pub mod context;
pub mod email;
pub mod password;
pub mod scope;
pub mod tfa;
pub mod token;
pub mod user;
