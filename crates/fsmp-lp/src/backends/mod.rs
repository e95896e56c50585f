pub mod portfolio;
pub mod simplex;
