pub mod client;
pub mod health;
pub mod reservation;
pub mod schedule;
pub mod service;
pub mod stylist;
