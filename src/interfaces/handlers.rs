pub mod admin;
pub mod auth;
pub mod contact;
pub mod flash;
pub mod home;
pub mod page;
pub mod projects;
pub mod system;
