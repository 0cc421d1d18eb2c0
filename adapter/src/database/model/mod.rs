pub mod client;
pub mod reservation;
pub mod schedule;
pub mod service;
pub mod stylist;
