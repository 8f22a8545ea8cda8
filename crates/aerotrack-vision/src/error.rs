/// Parameter errors raised when building pipeline stages.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VisionError {
    #[error("min_area_ratio must be a finite value in [0, 1] (got {0})")]
    InvalidAreaRatio(f64),

    #[error("smoothing alpha must be in (0, 1] (got {0})")]
    InvalidAlpha(f64),
}
