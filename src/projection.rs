use glam::Vec2;
use std::collections::BTreeMap;

use crate::detected_points::FrameTracks;
use crate::optimization::Homography;
use crate::util::foot_position;

/// Object id to tactical (top-down canvas) position for one frame.
pub type ProjectedPositions = BTreeMap<u32, Vec2>;

/// Maps camera-space points to the tactical view.
///
/// Without a homography the frame contributes no positions. Points that map
/// to infinity are left out individually.
pub fn project_positions(
    homography: Option<&Homography>,
    points: &BTreeMap<u32, Vec2>,
) -> ProjectedPositions {
    let Some(h) = homography else {
        return ProjectedPositions::new();
    };
    points
        .iter()
        .filter_map(|(id, p)| h.transform_point(*p).map(|tp| (*id, tp)))
        .collect()
}

/// Projects the foot position of every tracked object.
pub fn project_tracks(homography: Option<&Homography>, tracks: &FrameTracks) -> ProjectedPositions {
    let feet: BTreeMap<u32, Vec2> = tracks
        .iter()
        .map(|(id, obj)| (*id, foot_position(&obj.bbox)))
        .collect();
    project_positions(homography, &feet)
}
