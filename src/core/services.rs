pub mod admin;
pub mod question;
pub mod vote;
