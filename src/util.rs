use glam::Vec2;

/// Euclidean distance, computed in double precision.
pub fn measure_distance(p0: Vec2, p1: Vec2) -> f64 {
    let dx = p0.x as f64 - p1.x as f64;
    let dy = p0.y as f64 - p1.y as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Bottom-center of `[x1, y1, x2, y2]`, where a player's feet touch the court.
pub fn foot_position(bbox: &[f32; 4]) -> Vec2 {
    let [x1, _y1, x2, y2] = *bbox;
    Vec2::new((x1 + x2) / 2.0, y2)
}
