pub mod crs;
pub mod pointcloud;
pub mod warning;

pub use warning::Warning;
