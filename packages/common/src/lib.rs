pub mod mail;
pub mod storage;
