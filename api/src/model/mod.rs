pub mod reservation;
pub mod validation;
