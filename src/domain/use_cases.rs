pub mod admin;
pub mod auth;
pub mod contact;
pub mod engagement;
pub mod extractors;
pub mod portfolio;
