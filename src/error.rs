use thiserror::Error;

/// Contract violations and I/O failures.
///
/// Missing landmarks and degenerate geometry are not errors; they surface as
/// unchanged landmarks, `None` homographies or empty position maps.
#[derive(Debug, Error)]
pub enum TacticalViewError {
    #[error("frame has {got} landmarks but the reference layout has {expected}")]
    LandmarkCountMismatch { expected: usize, got: usize },

    #[error("{landmarks} landmark frames but {tracks} track frames")]
    FrameCountMismatch { landmarks: usize, tracks: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticalViewError>;
