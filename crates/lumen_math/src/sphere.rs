use crate::{Ray, Vec3};

/// Bounding sphere used by the BVH for its cheap reject test.
///
/// A sphere is defined by a center and a radius; it bounds every point
/// that was passed to [`BoundingSphere::expand_to`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// A zero-radius sphere at `center`, to be grown with `expand_to`.
    pub fn at(center: Vec3) -> Self {
        Self::new(center, 0.0)
    }

    /// Grow the radius (never the center) so that `point` is enclosed.
    pub fn expand_to(&mut self, point: Vec3) {
        let distance = (point - self.center).length();
        if distance > self.radius {
            self.radius = distance;
        }
    }

    /// Returns true if `point` lies inside the sphere, allowing `tolerance`.
    pub fn contains(&self, point: Vec3, tolerance: f32) -> bool {
        (point - self.center).length() <= self.radius + tolerance
    }

    /// Test if a ray intersects this sphere after translating it by `offset`.
    ///
    /// Uses the geometric method: project the center onto the ray, compare
    /// the squared closest-approach distance with the squared radius, and
    /// reject spheres that lie entirely behind the ray origin.
    pub fn hit(&self, ray: &Ray, offset: Vec3) -> bool {
        let radius2 = self.radius * self.radius;
        let l = self.center + offset - ray.origin();
        let tca = l.dot(ray.direction());
        let d2 = l.dot(l) - tca * tca;
        if d2 > radius2 {
            return false;
        }

        // t0 <= t1 always, so only the far root decides "behind the origin"
        let thc = (radius2 - d2).sqrt();
        let t1 = tca + thc;
        t1 >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_to_grows_radius_only() {
        let mut sphere = BoundingSphere::at(Vec3::ZERO);
        sphere.expand_to(Vec3::new(3.0, 4.0, 0.0));
        sphere.expand_to(Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(sphere.center, Vec3::ZERO);
        assert!((sphere.radius - 5.0).abs() < 1e-6);
        assert!(sphere.contains(Vec3::new(0.0, 0.0, 5.0), 1e-5));
        assert!(!sphere.contains(Vec3::new(0.0, 0.0, 5.1), 1e-5));
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(sphere.hit(&ray, Vec3::ZERO));

        // Ray missing the sphere
        let ray = Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z);
        assert!(!sphere.hit(&ray, Vec3::ZERO));

        // Sphere entirely behind the ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z);
        assert!(!sphere.hit(&ray, Vec3::ZERO));
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 2.0);
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::Y);

        assert!(sphere.hit(&ray, Vec3::ZERO));
    }

    #[test]
    fn test_sphere_hit_uses_offset() {
        let sphere = BoundingSphere::new(Vec3::ZERO, 1.0);
        let ray = Ray::new(Vec3::new(10.0, 0.0, -5.0), Vec3::Z);

        assert!(!sphere.hit(&ray, Vec3::ZERO));
        assert!(sphere.hit(&ray, Vec3::new(10.0, 0.0, 0.0)));
    }
}
