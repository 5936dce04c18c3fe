//! HTTP Routes

pub mod assessment;
pub mod predictions;
