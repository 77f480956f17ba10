use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaskError {
    #[error("no anchor named {0:?}")]
    UnknownAnchor(String),

    #[error("landmark {index} for {anchor} missing, face has {available} points")]
    MissingLandmark {
        anchor: &'static str,
        index: usize,
        available: usize,
    },

    #[error("landmark {index} for {anchor} is not finite")]
    NonFiniteLandmark { anchor: &'static str, index: usize },

    #[error("no mask named {0:?}")]
    UnknownMask(String),

    #[error("mask {0} has no registered renderer")]
    UnregisteredMask(&'static str),

    #[error("detection feed closed")]
    FeedClosed,
}

pub type Result<T> = std::result::Result<T, MaskError>;
