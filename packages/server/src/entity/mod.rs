pub mod admin_user;
pub mod contact_submission;
pub mod post;
