pub mod auth;
pub mod contact;
pub mod posts;
pub mod shared;
