//! A parametric, 3D-printable **PCB magazine**: two slotted rail frames held
//! apart by four dovetail bones, built on a small BSP-tree CSG kernel.
//!
//! Every part is a pure function of the user parameters ([`MagazineParams`])
//! and the construction constants ([`MagazineConfig`]):
//!
//! - [`frame::build_frame`]: plate, window, slotted rails, connector notches,
//!   cable-entry wedges and cosmetic chamfers
//! - [`bone::build_bone`]: the 13-point dovetail outline, extruded and
//!   chamfered on its flanks
//! - [`assembly::build_assembly`]: bottom frame, mirrored top frame and four
//!   upright bones as an ordered list of placements
//!
//! [`build`] is the single entry point; [`io::export_to_path`] writes the
//! result as binary/ASCII STL or STEP.
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): binary `.stl` export

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod assembly;
pub mod bone;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod frame;
pub mod io;
pub mod params;
pub mod solid;
pub mod traits;
pub mod triangulated;

pub use assembly::{Assembly, PartRole, Placement};
pub use config::{AssemblyConfig, BoneConfig, FrameConfig, MagazineConfig};
pub use errors::{MagazineError, MagazineResult};
pub use params::{Component, MagazineParams};
pub use solid::Solid;
pub use traits::SolidOps;

use tracing::info;

/// What a build hands back: a single part or a list of placed parts.
#[derive(Debug, Clone)]
pub enum Model {
    Solid(Solid),
    Assembly(Assembly),
}

impl Model {
    /// Each body in world coordinates; an assembly yields one per placement.
    pub fn bodies(&self) -> Vec<Solid> {
        match self {
            Model::Solid(solid) => vec![solid.clone()],
            Model::Assembly(assembly) => assembly.realize(),
        }
    }

    /// One solid for the whole model; assembly parts are merged as a compound.
    pub fn to_solid(&self) -> Solid {
        match self {
            Model::Solid(solid) => solid.clone(),
            Model::Assembly(assembly) => assembly.to_compound(),
        }
    }
}

/// Validate `params` for `component`, then build it.
///
/// A bone built on its own uses `params.b` as its tip-to-tip length.
pub fn build(component: Component, params: &MagazineParams, config: &MagazineConfig) -> MagazineResult<Model> {
    params.validate(component, config)?;
    info!(%component, ?params, "building");

    let model = match component {
        Component::Frame => Model::Solid(frame::build_frame(
            params.a,
            params.c,
            params.d,
            params.n,
            &config.frame,
        )?),
        Component::Bone => Model::Solid(bone::build_bone(params.b, &config.bone)?),
        Component::Assembly => Model::Assembly(assembly::build_assembly(params, config)?),
    };
    Ok(model)
}
