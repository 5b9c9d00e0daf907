pub mod court;
pub mod detected_points;
pub mod error;
pub mod io;
pub mod optimization;
pub mod pipeline;
pub mod projection;
pub mod synthetic;
pub mod types;
pub mod util;
pub mod validation;

pub use court::{CourtConfig, ReferenceLayout};
pub use detected_points::{FrameInput, FrameLandmarks, FrameTracks, TrackedObject};
pub use error::{Result, TacticalViewError};
pub use optimization::{Homography, HomographyConfig, HomographyEstimator, HomographyMethod};
pub use pipeline::TacticalViewConverter;
pub use projection::{ProjectedPositions, project_positions, project_tracks};
pub use types::FrameOutput;
pub use validation::{LandmarkValidator, ValidationReport, ValidatorConfig};
