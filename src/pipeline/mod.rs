//! The two analyses, end to end.

pub mod forest;
pub mod ortho;

pub use forest::ForestParams;
pub use ortho::OrthoParams;
