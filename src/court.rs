use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Physical court size and the top-down canvas it is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    pub width_m: f64,
    pub height_m: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            width_m: 28.0,
            height_m: 15.0,
            canvas_width: 300,
            canvas_height: 161,
        }
    }
}

impl CourtConfig {
    /// Canvas x coordinate of a physical offset along the court width.
    fn canvas_x(&self, offset_m: f64) -> i32 {
        ((offset_m / self.width_m) * self.canvas_width as f64).trunc() as i32
    }

    /// Canvas y coordinate of a physical offset along the court height.
    fn canvas_y(&self, offset_m: f64) -> i32 {
        ((offset_m / self.height_m) * self.canvas_height as f64).trunc() as i32
    }
}

/// Fixed landmark table in top-down canvas pixels.
///
/// The index of a point is the landmark identity and must match the ordering
/// of the keypoint detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLayout {
    config: CourtConfig,
    points: Vec<IVec2>,
}

impl ReferenceLayout {
    pub fn new(points: Vec<IVec2>, config: CourtConfig) -> ReferenceLayout {
        ReferenceLayout { config, points }
    }

    pub fn from_config(config: &CourtConfig) -> ReferenceLayout {
        Self::init_basketball_court(config)
    }

    /// The 18 basketball court keypoints: both side lines, the midline and
    /// both free-throw lines.
    pub fn init_basketball_court(config: &CourtConfig) -> ReferenceLayout {
        let w = config.canvas_width as i32;
        let h = config.canvas_height as i32;
        let free_throw_x = 5.79;
        let rows_m = [0.91, 5.18, 10.0, 14.1];
        let [y091, y518, y10, y141] = rows_m.map(|m| config.canvas_y(m));

        let points = vec![
            // left edge
            IVec2::new(0, 0),
            IVec2::new(0, y091),
            IVec2::new(0, y518),
            IVec2::new(0, y10),
            IVec2::new(0, y141),
            IVec2::new(0, h),
            // midline
            IVec2::new(w / 2, h),
            IVec2::new(w / 2, 0),
            // left free-throw line
            IVec2::new(config.canvas_x(free_throw_x), y518),
            IVec2::new(config.canvas_x(free_throw_x), y10),
            // right edge
            IVec2::new(w, h),
            IVec2::new(w, y141),
            IVec2::new(w, y10),
            IVec2::new(w, y518),
            IVec2::new(w, y091),
            IVec2::new(w, 0),
            // right free-throw line
            IVec2::new(config.canvas_x(config.width_m - free_throw_x), y518),
            IVec2::new(config.canvas_x(config.width_m - free_throw_x), y10),
        ];
        ReferenceLayout::new(points, *config)
    }

    pub fn config(&self) -> &CourtConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    pub fn point(&self, idx: usize) -> Option<Vec2> {
        self.points.get(idx).map(|p| p.as_vec2())
    }

    /// Converts a tactical position from canvas pixels to meters.
    pub fn canvas_to_meters(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            (p.x as f64 * self.config.width_m / self.config.canvas_width as f64) as f32,
            (p.y as f64 * self.config.height_m / self.config.canvas_height as f64) as f32,
        )
    }
}

impl Default for ReferenceLayout {
    fn default() -> Self {
        create_default_basketball_court()
    }
}

pub fn create_default_basketball_court() -> ReferenceLayout {
    ReferenceLayout::from_config(&CourtConfig::default())
}
