#![allow(async_fn_in_trait)]

pub mod admin;
pub mod core;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;
pub mod settings;
pub mod templates;
