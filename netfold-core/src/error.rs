use thiserror::Error;

/// Top-level error type for the netfold core.
#[derive(Debug, Error, PartialEq)]
pub enum NetfoldError {
    #[error("no layout with id `{0}`")]
    InvalidLayoutId(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Hollow(#[from] HollowError),
}

/// Defects in a layout definition. These are detected while the registry is
/// built and never occur once a registry exists.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("malformed net grid `{grid}`: {reason}")]
    MalformedGrid { grid: String, reason: String },

    #[error("net `{id}` has {count} faces, a cube net needs 6")]
    WrongFaceCount { id: String, count: usize },

    #[error("layout `{id}` repeats face label `{label}`")]
    DuplicateLabel { id: String, label: String },

    #[error("net `{id}` is not connected: face `{label}` cannot be reached")]
    Disconnected { id: String, label: String },

    #[error("net `{id}` has no face `{label}` to fold to the front")]
    MissingFront { id: String, label: char },

    #[error("net `{id}` folds faces `{first}` and `{second}` onto the same side")]
    OverlappingFaces {
        id: String,
        first: String,
        second: String,
    },

    #[error("layout `{id}` has no faces")]
    Empty { id: String },

    #[error("layout `{id}`: face `{label}` has a non-finite pose")]
    NonFinitePose { id: String, label: String },

    #[error("layout id `{0}` is registered twice")]
    DuplicateLayoutId(String),
}

/// Rejected hollow-cube dimensions.
#[derive(Debug, Error, PartialEq)]
pub enum HollowError {
    #[error("cube side {side} must be a positive finite number")]
    InvalidSide { side: f32 },

    #[error("sub-cube side {sub_side} must be positive and smaller than the cube side {side}")]
    InvalidSubSide { side: f32, sub_side: f32 },

    #[error("cube side {side} is more than {max} times the sub-cube side {sub_side}")]
    RatioTooLarge { side: f32, sub_side: f32, max: f32 },

    #[error("unknown hollow case `{0}`, expected none, corner, edge or face")]
    UnknownCase(String),
}

/// Convenience type alias for results using [`NetfoldError`].
pub type Result<T> = std::result::Result<T, NetfoldError>;
