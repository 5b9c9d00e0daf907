use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::types::FrameOutput;

/// Serializes an object to a pretty-printed JSON file.
pub fn object_to_json<T: Serialize, P: AsRef<Path>>(output_path: P, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned, P: AsRef<Path>>(file_path: P) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Summary of one run over a frame sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub total_frames: usize,
    pub frames_with_homography: usize,
    pub invalidated_landmarks: usize,
    pub projected_positions: usize,
    /// Mean over frames that have a homography.
    pub mean_reprojection_rms: Option<f64>,
}

impl RunReport {
    pub fn from_outputs(outputs: &[FrameOutput]) -> RunReport {
        use std::time::SystemTime;

        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let rms: Vec<f64> = outputs.iter().filter_map(|o| o.reprojection_rms).collect();
        let mean_reprojection_rms =
            (!rms.is_empty()).then(|| rms.iter().sum::<f64>() / rms.len() as f64);

        RunReport {
            timestamp: timestamp.to_string(),
            total_frames: outputs.len(),
            frames_with_homography: outputs.iter().filter(|o| o.has_homography()).count(),
            invalidated_landmarks: outputs.iter().map(|o| o.invalidated.len()).sum(),
            projected_positions: outputs.iter().map(|o| o.positions.len()).sum(),
            mean_reprojection_rms,
        }
    }
}

pub fn write_report<P: AsRef<Path>>(output_path: P, outputs: &[FrameOutput]) -> Result<RunReport> {
    let report = RunReport::from_outputs(outputs);
    object_to_json(output_path, &report)?;
    Ok(report)
}
