mod common;
mod posts;
