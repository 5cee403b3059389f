pub mod device;
pub mod portfolio;
