pub mod database;
pub mod replication;
pub mod repository;
