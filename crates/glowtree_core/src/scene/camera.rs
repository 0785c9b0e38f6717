//! Camera, pointer picking and fly-to animation.

use crate::model::vec3::Vec3;
use crate::scene::animation::ease_in_out_cubic;
use log::debug;

/// Distance kept between the camera and a node after a fly-to.
pub const FLY_TO_DISTANCE: f64 = 3.5;
pub const FLY_TO_DURATION: f64 = 1.5;

/// Canvas size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Pointer location in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Perspective camera looking at `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f64,
    pub viewport: Viewport,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, viewport: Viewport) -> Self {
        Self {
            position,
            target,
            up: Vec3::UP,
            fov_y_degrees: 60.0,
            viewport,
        }
    }

    /// World-space ray from the eye through `pointer`.
    pub fn ray_through(&self, pointer: PointerPosition) -> Ray {
        let width = self.viewport.width.max(1.0);
        let height = self.viewport.height.max(1.0);
        let ndc_x = 2.0 * pointer.x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * pointer.y / height;

        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * width / height;

        let direction =
            (forward + right * (ndc_x * half_width) + up * (ndc_y * half_height)).normalize();
        Ray {
            origin: self.position,
            direction,
        }
    }

    /// Pixel coordinates of a world point, or `None` when behind the eye.
    pub fn project(&self, point: Vec3) -> Option<PointerPosition> {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        let relative = point - self.position;
        let depth = relative.dot(forward);
        if depth <= f64::EPSILON {
            return None;
        }

        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * self.viewport.width / self.viewport.height;
        let ndc_x = relative.dot(right) / (depth * half_width);
        let ndc_y = relative.dot(up) / (depth * half_height);
        Some(PointerPosition {
            x: (ndc_x + 1.0) * 0.5 * self.viewport.width,
            y: (1.0 - ndc_y) * 0.5 * self.viewport.height,
        })
    }
}

/// Half-line with unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Distance to the first intersection with a sphere in front of the origin.
    pub fn intersect_sphere(&self, center: Vec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    from_position: Vec3,
    to_position: Vec3,
    from_target: Vec3,
    to_target: Vec3,
    elapsed: f64,
}

/// Camera fly-to that refuses to overlap with a flight in progress.
#[derive(Debug, Default)]
pub struct FlyTo {
    flight: Option<Flight>,
}

impl FlyTo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.flight.is_some()
    }

    /// Starts flying toward `focus`. Returns `false` and ignores the request
    /// while another flight is active.
    pub fn start(&mut self, camera: &Camera, focus: Vec3) -> bool {
        if self.flight.is_some() {
            debug!("event=fly_to module=scene status=ignored reason=in_flight");
            return false;
        }

        let mut back = (camera.position - focus).normalize();
        if back == Vec3::ZERO {
            back = Vec3::new(0.0, 0.0, 1.0);
        }
        self.flight = Some(Flight {
            from_position: camera.position,
            to_position: focus + back * FLY_TO_DISTANCE,
            from_target: camera.target,
            to_target: focus,
            elapsed: 0.0,
        });
        true
    }

    /// Advances the flight and moves `camera`. Returns whether it is still active.
    pub fn update(&mut self, dt: f64, camera: &mut Camera) -> bool {
        let Some(flight) = self.flight.as_mut() else {
            return false;
        };

        flight.elapsed += dt.max(0.0);
        let t = flight.elapsed / FLY_TO_DURATION;
        if t >= 1.0 {
            camera.position = flight.to_position;
            camera.target = flight.to_target;
            self.flight = None;
            return false;
        }

        let eased = ease_in_out_cubic(t);
        camera.position = flight.from_position.lerp(flight.to_position, eased);
        camera.target = flight.from_target.lerp(flight.to_target, eased);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, FlyTo, PointerPosition, Ray, Viewport, FLY_TO_DISTANCE};
    use crate::model::vec3::Vec3;

    fn camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::ZERO,
            Viewport {
                width: 800.0,
                height: 600.0,
            },
        )
    }

    #[test]
    fn center_pixel_ray_points_at_target() {
        let ray = camera().ray_through(PointerPosition { x: 400.0, y: 300.0 });
        assert!((ray.direction.z + 1.0).abs() < 1e-12);
        assert!(ray.direction.x.abs() < 1e-12 && ray.direction.y.abs() < 1e-12);
    }

    #[test]
    fn project_inverts_ray_through() {
        let cam = camera();
        let point = Vec3::new(1.5, -0.75, 2.0);
        let pixel = cam.project(point).unwrap();
        let ray = cam.ray_through(pixel);
        let hit = ray.intersect_sphere(point, 0.01);
        assert!(hit.is_some());
    }

    #[test]
    fn sphere_behind_origin_is_missed() {
        let ray = Ray {
            origin: Vec3::ZERO,
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        assert_eq!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), Some(4.0));
    }

    #[test]
    fn fly_to_ignores_overlapping_requests_and_finishes() {
        let mut cam = camera();
        let mut fly = FlyTo::new();
        assert!(fly.start(&cam, Vec3::new(2.0, 0.0, 0.0)));
        assert!(!fly.start(&cam, Vec3::new(-9.0, 0.0, 0.0)));

        assert!(fly.update(0.5, &mut cam));
        assert!(!fly.update(2.0, &mut cam));
        assert!(!fly.is_active());
        assert_eq!(cam.target, Vec3::new(2.0, 0.0, 0.0));
        assert!((cam.position.distance(cam.target) - FLY_TO_DISTANCE).abs() < 1e-9);
        assert!(fly.start(&cam, Vec3::ZERO));
    }
}
