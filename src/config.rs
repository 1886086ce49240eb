//! Construction constants of every part, grouped per builder.
//!
//! Builders take these explicitly so a part is a pure function of its
//! parameters and its config. The defaults reproduce the stock magazine.

use crate::errors::MagazineResult;
use crate::float_types::Real;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rail frame constants (all lengths in mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Inner window extends this much over the PCB width
    pub len_extra: Real,
    pub plate_thickness: Real,
    /// Rail depth into the inner window
    pub nose_depth: Real,
    /// Side wall width along X, net of the rail
    pub frame_wall_x: Real,
    pub frame_wall_y: Real,
    /// Extra margin above and below the slot field
    pub top_bottom_margin: Real,
    pub connector_height: Real,
    pub connector_width: Real,
    /// Distance from the outer X edge to the connector opening
    pub connector_x_offset: Real,
    /// Horizontal leg of the cable-entry wedge
    pub cable_chamfer_x: Real,
    pub outer_corner_chamfer: Real,
    pub connector_top_chamfer: Real,
    /// Extra Z height of a slot cutter over the plate
    pub slot_overcut: Real,
}

impl Default for FrameConfig {
    fn default() -> Self {
        let nose_depth = 3.0;
        Self {
            len_extra: 5.0,
            plate_thickness: 8.0,
            nose_depth,
            frame_wall_x: 10.0 - nose_depth,
            frame_wall_y: 10.0,
            top_bottom_margin: 2.0,
            connector_height: 5.0,
            connector_width: 6.0,
            connector_x_offset: 8.0,
            cable_chamfer_x: 4.0,
            outer_corner_chamfer: 2.0,
            connector_top_chamfer: 0.5,
            slot_overcut: 0.2,
        }
    }
}

impl FrameConfig {
    /// Vertical leg of the cable-entry wedge: the full plate thickness.
    pub const fn cable_chamfer_z(&self) -> Real {
        self.plate_thickness
    }
}

/// Dovetail bone constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneConfig {
    /// Extrusion height (Z)
    pub thickness: Real,
    /// Half width at the dovetail tip
    pub x_out: Real,
    /// Half width of the body
    pub x_mid: Real,
    /// Half width of the neck between shoulder and tip
    pub x_in: Real,
    /// Dovetail length per side, shoulder to tip
    pub l_dovetail: Real,
    pub edge_chamfer: Real,
}

impl Default for BoneConfig {
    fn default() -> Self {
        Self {
            thickness: 5.0,
            x_out: 7.0,
            x_mid: 5.0,
            x_in: 3.0,
            l_dovetail: 8.0,
            edge_chamfer: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Bones sit this far inside the frame's outer X edge
    pub bone_x_inset: Real,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self { bone_x_inset: 11.0 }
    }
}

/// Everything the builders need besides the user parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagazineConfig {
    pub frame: FrameConfig,
    pub bone: BoneConfig,
    pub assembly: AssemblyConfig,
}

impl MagazineConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> MagazineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> MagazineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> MagazineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
