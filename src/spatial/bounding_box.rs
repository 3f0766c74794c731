use nalgebra::{Point3, Vector3};

use super::Float;

#[derive(Debug, thiserror::Error)]
pub enum AabbError {
    #[error("cannot bound an empty set of points")]
    Empty,
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<Real: Float> {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl<Real: Float> Aabb<Real> {
    #[inline]
    pub fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The smallest box containing every point yielded by `points`.
    ///
    /// # Errors
    ///
    /// * [Empty](AabbError::Empty) if `points` yields nothing
    pub fn try_from_points(
        mut points: impl Iterator<Item = Point3<Real>>,
    ) -> Result<Self, AabbError> {
        let first = points.next().ok_or(AabbError::Empty)?;
        Ok(points.fold(Self::new(first, first), |mut b, p| {
            b.mins = b.mins.inf(&p);
            b.maxs = b.maxs.sup(&p);
            b
        }))
    }

    #[inline]
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        let Self { mins: i, maxs: a } = self;
        nalgebra::point![
            (i.x + a.x) / Real::TWO,
            (i.y + a.y) / Real::TWO,
            (i.z + a.z) / Real::TWO
        ]
    }

    /// The edge lengths of `self` along each axis.
    #[inline]
    pub fn extents(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }
}
