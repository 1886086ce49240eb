use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::Real;
use crate::solid::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Boolean operations + transformations: the kernel capability the part
/// builders are written against.
pub trait SolidOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Rotates about the origin by x_degrees, y_degrees, z_degrees
    /// (X applied first, then Y, then Z).
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        self.transform(&(rz * ry * rx).to_homogeneous())
    }

    /// Rotates about the origin applying Z first, then Y, then X; the order
    /// placements are realised in. Zero angles are skipped.
    fn rotate_zyx(&self, z_deg: Real, y_deg: Real, x_deg: Real) -> Self {
        let mut rot = Rotation3::identity();
        if z_deg != 0.0 {
            rot = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians()) * rot;
        }
        if y_deg != 0.0 {
            rot = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians()) * rot;
        }
        if x_deg != 0.0 {
            rot = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians()) * rot;
        }
        if rot == Rotation3::identity() {
            return self.clone();
        }
        self.transform(&rot.to_homogeneous())
    }

    /// Reflect (mirror) about `plane`.
    ///
    /// The reflection reverses handedness, so polygons are inverted afterwards
    /// to keep their normals pointing outward.
    fn mirror(&self, plane: Plane) -> Self {
        let len = plane.normal().norm();
        if len < Real::EPSILON {
            return self.clone();
        }
        let n = plane.normal() / len;
        let offset = n * (plane.offset() / len);

        let to_origin = Translation3::from(-offset).to_homogeneous();
        let mut reflect = Matrix4::identity();
        reflect
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(Matrix3::identity() - 2.0 * n * n.transpose()));
        let back = Translation3::from(offset).to_homogeneous();

        self.transform(&(back * reflect * to_origin)).inverse()
    }
}
