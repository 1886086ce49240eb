//! Errors raised while validating parameters, building solids or exporting them.

use crate::float_types::Real;

/// Everything a build or export call can fail with.
///
/// Nothing is retried: a failing boolean, chamfer or write aborts the whole
/// call and no partial part or assembly is handed back.
#[derive(Debug, thiserror::Error)]
pub enum MagazineError {
    /// (ParameterRange) A caller-supplied parameter is outside its valid range
    #[error("(ParameterRange) parameter `{name}` = {value} is invalid: {requirement}")]
    ParameterRange {
        name: &'static str,
        value: Real,
        requirement: &'static str,
    },

    /// (Construction) The kernel produced an unusable solid
    #[error("(Construction) {0}")]
    Construction(String),

    /// (EmptySelection) An edge/face selector matched nothing
    #[error("(EmptySelection) no edge matched {what}")]
    EmptySelection { what: String },

    /// (UnsupportedFormat) Export format is not one of stl, stl-ascii, step, stp
    #[error("(UnsupportedFormat) unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// (UnknownComponent) Component name is not one of frame, bone, assembly
    #[error("(UnknownComponent) unknown component `{0}`, expected frame, bone or assembly")]
    UnknownComponent(String),

    /// I/O failure while writing an export
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("(Config) {0}")]
    Config(#[from] serde_json::Error),
}

pub type MagazineResult<T> = Result<T, MagazineError>;

impl MagazineError {
    pub(crate) fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }
}
