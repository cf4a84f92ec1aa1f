pub mod contact;
pub mod engagement;
pub mod experience;
pub mod flash;
pub mod principal;
pub mod project;
pub mod skill;
pub mod token;
pub mod user;
