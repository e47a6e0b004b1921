/// Error types surfaced to the presentation layer
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("This site is already in your favorites")]
    DuplicateFavorite,
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),
    #[error("Unknown widget type: {0}")]
    UnknownWidgetType(String),
    #[error("Unknown group: {0}")]
    UnknownGroup(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
