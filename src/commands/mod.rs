pub mod config;
pub mod lights;
pub mod login;
pub mod run;
pub mod service;
