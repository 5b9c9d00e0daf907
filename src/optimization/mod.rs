pub mod homography;
pub mod ransac;
pub mod refine;

pub use homography::*;
pub use ransac::*;
