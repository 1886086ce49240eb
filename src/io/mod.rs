//! Export of built parts to mesh (STL) and faceted B-rep (STEP) files.

pub mod step;
pub mod stl;

use crate::Model;
use crate::errors::{MagazineError, MagazineResult};
use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Binary STL
    #[default]
    Stl,
    StlAscii,
    /// STEP AP214, faceted
    Step,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Stl | ExportFormat::StlAscii => "stl",
            ExportFormat::Step => "step",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Stl => "stl",
            ExportFormat::StlAscii => "stl-ascii",
            ExportFormat::Step => "step",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = MagazineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stl" => Ok(ExportFormat::Stl),
            "stl-ascii" | "stl_ascii" => Ok(ExportFormat::StlAscii),
            "step" | "stp" => Ok(ExportFormat::Step),
            _ => Err(MagazineError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialise `model` in `format`. Assemblies are realised first; STL gets
/// one merged triangle soup, STEP one B-rep per part.
pub fn export_bytes(model: &Model, name: &str, format: ExportFormat) -> MagazineResult<Vec<u8>> {
    match format {
        #[cfg(feature = "stl-io")]
        ExportFormat::Stl => Ok(stl::to_stl_binary(&model.to_solid())?),
        #[cfg(not(feature = "stl-io"))]
        ExportFormat::Stl => Err(MagazineError::UnsupportedFormat(
            "stl (built without the stl-io feature)".to_string(),
        )),
        ExportFormat::StlAscii => Ok(stl::to_stl_ascii(&model.to_solid(), name).into_bytes()),
        ExportFormat::Step => Ok(step::to_step(&model.bodies(), name).into_bytes()),
    }
}

/// Write `model` to `path`, creating missing parent directories, and return
/// the absolute path written.
pub fn export_to_path(model: &Model, path: impl AsRef<Path>, format: ExportFormat) -> MagazineResult<PathBuf> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    let bytes = export_bytes(model, name, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;

    let written = path.canonicalize()?;
    info!(path = %written.display(), %format, bytes = bytes.len(), "exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!("STL".parse::<ExportFormat>().unwrap(), ExportFormat::Stl);
        assert_eq!("stp".parse::<ExportFormat>().unwrap(), ExportFormat::Step);
        assert_eq!("Step".parse::<ExportFormat>().unwrap(), ExportFormat::Step);
        assert_eq!("stl-ascii".parse::<ExportFormat>().unwrap(), ExportFormat::StlAscii);
        assert!(matches!(
            "obj".parse::<ExportFormat>(),
            Err(MagazineError::UnsupportedFormat(f)) if f == "obj"
        ));
        assert_eq!(ExportFormat::Step.extension(), "step");
    }
}
