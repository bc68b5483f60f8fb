pub mod forest;
pub mod ndvi;
