//! User parameters of a build and their entry-point validation.

use crate::bone::max_edge_chamfer;
use crate::config::MagazineConfig;
use crate::errors::{MagazineError, MagazineResult};
use crate::float_types::{Real, tolerance};
use crate::frame::{FrameDimensions, connector_margin};
use core::fmt;
use core::str::FromStr;

/// Which part a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Component {
    Frame,
    Bone,
    #[default]
    Assembly,
}

impl Component {
    pub const fn name(self) -> &'static str {
        match self {
            Component::Frame => "frame",
            Component::Bone => "bone",
            Component::Assembly => "assembly",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Component {
    type Err = MagazineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frame" => Ok(Component::Frame),
            "bone" => Ok(Component::Bone),
            "assembly" => Ok(Component::Assembly),
            _ => Err(MagazineError::UnknownComponent(s.to_string())),
        }
    }
}

/// Caller-supplied dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagazineParams {
    /// PCB width, the usable X extent of the window
    pub a: Real,
    /// Bone tip-to-tip length and the assembly's total height
    pub b: Real,
    /// Slot width, i.e. PCB thickness
    pub c: Real,
    /// Nose width between and around slots
    pub d: Real,
    /// Slot count, one PCB per slot
    pub n: usize,
}

impl Default for MagazineParams {
    fn default() -> Self {
        Self {
            a: 90.0,
            b: 120.0,
            c: 1.6,
            d: 10.0,
            n: 10,
        }
    }
}

fn positive(name: &'static str, value: Real) -> MagazineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MagazineError::ParameterRange {
            name,
            value,
            requirement: "must be a positive, finite length",
        })
    }
}

impl MagazineParams {
    /// Parameters the frame depends on: `a`, `c`, `d` and `n`.
    ///
    /// The frame must also be wide enough that the connector cuts on its two
    /// halves stay apart.
    pub fn validate_frame(&self, config: &MagazineConfig) -> MagazineResult<()> {
        positive("a", self.a)?;
        positive("c", self.c)?;
        positive("d", self.d)?;
        if self.n == 0 {
            return Err(MagazineError::ParameterRange {
                name: "n",
                value: 0.0,
                requirement: "at least one slot is required",
            });
        }
        let cfg = &config.frame;
        let dims = FrameDimensions::new(self.a, self.c, self.d, self.n, cfg);
        if connector_margin(&dims, cfg) <= tolerance() {
            return Err(MagazineError::ParameterRange {
                name: "a",
                value: self.a,
                requirement: "too narrow: the connector notches and cable wedges of both halves would meet",
            });
        }
        Ok(())
    }

    /// `b` must be a length whose clamped dovetail still carries the flank chamfer.
    pub fn validate_bone(&self, config: &MagazineConfig) -> MagazineResult<()> {
        positive("b", self.b)?;
        let cfg = &config.bone;
        if cfg.edge_chamfer > 0.0 && cfg.edge_chamfer >= max_edge_chamfer(self.b, cfg) - tolerance() {
            return Err(MagazineError::ParameterRange {
                name: "b",
                value: self.b,
                requirement: "too short: the clamped dovetail cannot carry the bone's edge chamfer",
            });
        }
        Ok(())
    }

    /// An assembly also needs room between the two frames.
    pub fn validate_assembly(&self, config: &MagazineConfig) -> MagazineResult<()> {
        self.validate_frame(config)?;
        self.validate_bone(config)?;
        if self.b <= config.frame.plate_thickness {
            return Err(MagazineError::ParameterRange {
                name: "b",
                value: self.b,
                requirement: "must exceed the plate thickness so the frames do not overlap",
            });
        }
        Ok(())
    }

    pub fn validate(&self, component: Component, config: &MagazineConfig) -> MagazineResult<()> {
        match component {
            Component::Frame => self.validate_frame(config),
            Component::Bone => self.validate_bone(config),
            Component::Assembly => self.validate_assembly(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_parsing() {
        assert_eq!("Frame".parse::<Component>().unwrap(), Component::Frame);
        assert_eq!(" bone ".parse::<Component>().unwrap(), Component::Bone);
        assert!("gear".parse::<Component>().is_err());
        assert_eq!(Component::default().to_string(), "assembly");
    }

    #[test]
    fn range_errors_name_the_parameter() {
        let cfg = MagazineConfig::default();
        let bad = MagazineParams { c: 0.0, ..Default::default() };
        match bad.validate(Component::Frame, &cfg) {
            Err(MagazineError::ParameterRange { name, .. }) => assert_eq!(name, "c"),
            other => panic!("expected a range error, got {other:?}"),
        }

        let no_slots = MagazineParams { n: 0, ..Default::default() };
        assert!(no_slots.validate_frame(&cfg).is_err());

        let nan = MagazineParams { a: Real::NAN, ..Default::default() };
        assert!(nan.validate_frame(&cfg).is_err());
    }

    #[test]
    fn bone_ignores_frame_parameters() {
        let cfg = MagazineConfig::default();
        let p = MagazineParams { n: 0, d: -1.0, b: 5.0, ..Default::default() };
        assert!(p.validate(Component::Bone, &cfg).is_ok());
        assert!(p.validate(Component::Assembly, &cfg).is_err());
    }

    #[test]
    fn narrow_frames_are_rejected_before_building() {
        let cfg = MagazineConfig::default();
        // connector x = (a + 19) / 2 - 11; the inner wedge reaches 7.4 further in
        for a in [1.0, 4.0, 9.0, 17.0] {
            let p = MagazineParams { a, ..Default::default() };
            assert!(matches!(
                p.validate_frame(&cfg),
                Err(MagazineError::ParameterRange { name: "a", .. })
            ));
        }
        let p = MagazineParams { a: 20.0, ..Default::default() };
        assert!(p.validate_frame(&cfg).is_ok());
    }

    #[test]
    fn short_bones_must_carry_the_edge_chamfer() {
        let mut cfg = MagazineConfig::default();
        let p = MagazineParams { b: 4.0, ..Default::default() };
        assert!(matches!(
            p.validate_bone(&cfg),
            Err(MagazineError::ParameterRange { name: "b", .. })
        ));
        // without a chamfer any positive length will do
        cfg.bone.edge_chamfer = 0.0;
        assert!(p.validate_bone(&cfg).is_ok());
    }

    #[test]
    fn assembly_span_must_clear_the_plates() {
        let cfg = MagazineConfig::default();
        let p = MagazineParams { b: 8.0, ..Default::default() };
        assert!(matches!(
            p.validate_assembly(&cfg),
            Err(MagazineError::ParameterRange { name: "b", .. })
        ));
        assert!(MagazineParams::default().validate_assembly(&cfg).is_ok());
    }
}
