pub mod intake;
pub mod repository;
pub mod validation;
