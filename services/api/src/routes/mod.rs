pub mod admin;
pub mod appointments;
pub mod auth;
pub mod cart;
pub mod prescriptions;
pub mod products;
pub mod profile;
