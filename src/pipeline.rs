use indicatif::ParallelProgressIterator;
use log::{debug, info};
use rayon::prelude::*;

use crate::court::ReferenceLayout;
use crate::detected_points::{FrameInput, FrameLandmarks, FrameTracks};
use crate::error::{Result, TacticalViewError};
use crate::optimization::{HomographyConfig, HomographyEstimator, landmark_correspondences};
use crate::projection::{ProjectedPositions, project_tracks};
use crate::types::FrameOutput;
use crate::validation::{LandmarkValidator, ValidatorConfig};

/// Validates court landmarks and projects tracked players onto the top-down
/// court, one independent frame at a time.
pub struct TacticalViewConverter {
    layout: ReferenceLayout,
    validator_config: ValidatorConfig,
    homography_config: HomographyConfig,
    show_progress: bool,
}

impl TacticalViewConverter {
    pub fn new(
        layout: ReferenceLayout,
        validator_config: ValidatorConfig,
        homography_config: HomographyConfig,
    ) -> TacticalViewConverter {
        TacticalViewConverter {
            layout,
            validator_config,
            homography_config,
            show_progress: false,
        }
    }

    /// Draws a progress bar while processing frame sequences.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn layout(&self) -> &ReferenceLayout {
        &self.layout
    }

    pub fn validator(&self) -> LandmarkValidator<'_> {
        LandmarkValidator::new(&self.layout, self.validator_config)
    }

    pub fn estimator(&self) -> HomographyEstimator<'_> {
        HomographyEstimator::new(&self.layout, self.homography_config)
    }

    /// Corrected copy of every frame's landmarks.
    pub fn validate_keypoints(&self, frames: &[FrameLandmarks]) -> Result<Vec<FrameLandmarks>> {
        let validator = self.validator();
        self.map_frames(frames, |_, landmarks| validator.validate(landmarks))
    }

    /// Tactical positions of every tracked object, frame by frame. `keypoints`
    /// are expected to be validated already.
    pub fn transform_players_to_tactical_view(
        &self,
        keypoints: &[FrameLandmarks],
        tracks: &[FrameTracks],
    ) -> Result<Vec<ProjectedPositions>> {
        if keypoints.len() != tracks.len() {
            return Err(TacticalViewError::FrameCountMismatch {
                landmarks: keypoints.len(),
                tracks: tracks.len(),
            });
        }
        let pairs: Vec<_> = keypoints.iter().zip(tracks).collect();
        let estimator = self.estimator();
        self.map_frames(&pairs, |_, (landmarks, frame_tracks)| {
            let homography = estimator.estimate(landmarks)?;
            Ok(project_tracks(homography.as_ref(), frame_tracks))
        })
    }

    pub fn process_frame(&self, frame_index: usize, frame: &FrameInput) -> Result<FrameOutput> {
        let (landmarks, report) = self.validator().validate_with_report(&frame.landmarks)?;
        let homography = self.estimator().estimate(&landmarks)?;
        let reprojection_rms = homography.as_ref().map(|h| {
            let (src, dst) = landmark_correspondences(&landmarks, &self.layout);
            h.reprojection_rms(&src, &dst)
        });
        let positions = project_tracks(homography.as_ref(), &frame.tracks);
        debug!(
            "frame {}: {} rejected, homography {}, {} positions",
            frame_index,
            report.invalidated.len(),
            homography.is_some(),
            positions.len()
        );
        Ok(FrameOutput {
            frame_index,
            landmarks,
            invalidated: report.invalidated,
            homography: homography.map(|h| h.to_rows()),
            reprojection_rms,
            positions,
        })
    }

    /// Processes all frames in parallel. Output order follows input order.
    pub fn process_frames(&self, frames: &[FrameInput]) -> Result<Vec<FrameOutput>> {
        let outputs = self.map_frames(frames, |i, frame| self.process_frame(i, frame))?;
        info!(
            "{} of {} frames have a tactical view",
            outputs.iter().filter(|o| o.has_homography()).count(),
            outputs.len()
        );
        Ok(outputs)
    }

    fn map_frames<T, U, F>(&self, frames: &[T], f: F) -> Result<Vec<U>>
    where
        T: Sync,
        U: Send,
        F: Fn(usize, &T) -> Result<U> + Send + Sync,
    {
        let iter = frames.par_iter().enumerate();
        if self.show_progress {
            iter.progress_count(frames.len() as u64)
                .map(|(i, frame)| f(i, frame))
                .collect()
        } else {
            iter.map(|(i, frame)| f(i, frame)).collect()
        }
    }
}

impl Default for TacticalViewConverter {
    fn default() -> Self {
        TacticalViewConverter::new(
            ReferenceLayout::default(),
            ValidatorConfig::default(),
            HomographyConfig::default(),
        )
    }
}
