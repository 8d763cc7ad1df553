use rand::Rng;
use std::f64::consts::PI;
use std::time::Duration;

pub const DESKTOP_SHAPES: usize = 15;
pub const MOBILE_SHAPES: usize = 10;
pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const SPIN_PER_FRAME: f64 = 0.005;
pub const BOB_AMPLITUDE: f64 = 0.002;
pub const CUBE_MAX_TILT_DEG: f64 = 30.0;

/// A per-frame visual effect. Effects own their own state and never read
/// page state.
pub trait Effect {
    fn frame(&mut self, now: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Wireframe shapes drifting behind the hero section.
#[derive(Debug, Clone)]
pub struct FloatingShapes {
    shapes: Vec<Shape>,
}

impl FloatingShapes {
    pub fn for_viewport_width<R: Rng>(width: f64, rng: &mut R) -> Self {
        let count = if width < MOBILE_BREAKPOINT {
            MOBILE_SHAPES
        } else {
            DESKTOP_SHAPES
        };
        Self::scatter(count, rng)
    }

    pub fn scatter<R: Rng>(count: usize, rng: &mut R) -> Self {
        let shapes = (0..count)
            .map(|_| Shape {
                position: Vec3 {
                    x: rng.random_range(-10.0..10.0),
                    y: rng.random_range(-10.0..10.0),
                    z: rng.random_range(-10.0..10.0),
                },
                rotation: Vec3 {
                    x: rng.random_range(0.0..PI),
                    y: rng.random_range(0.0..PI),
                    z: rng.random_range(0.0..PI),
                },
            })
            .collect();
        Self { shapes }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl Effect for FloatingShapes {
    fn frame(&mut self, now: Duration) {
        let t = now.as_secs_f64() * 1000.0;
        for (index, shape) in self.shapes.iter_mut().enumerate() {
            let spin_x = if index % 2 == 0 { SPIN_PER_FRAME } else { -SPIN_PER_FRAME };
            let spin_y = if index % 3 == 0 { SPIN_PER_FRAME } else { -SPIN_PER_FRAME };
            shape.rotation.x += spin_x;
            shape.rotation.y += spin_y;
            shape.position.y += (t * 0.001 + index as f64).sin() * BOB_AMPLITUDE;
        }
    }
}

/// CSS cube that tilts toward the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltCube {
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
}

impl TiltCube {
    /// `x` and `y` are the pointer position relative to the container, 0..=1.
    pub fn point_at(&mut self, x: f64, y: f64) {
        self.rotate_x_deg = (y - 0.5) * CUBE_MAX_TILT_DEG;
        self.rotate_y_deg = (x - 0.5) * CUBE_MAX_TILT_DEG;
    }

    pub fn css_transform(&self) -> String {
        format!(
            "rotateX({}deg) rotateY({}deg)",
            self.rotate_x_deg, self.rotate_y_deg
        )
    }
}

/// Drives a set of effects frame by frame.
#[derive(Default)]
pub struct AnimationLoop {
    effects: Vec<Box<dyn Effect + Send>>,
    elapsed: Duration,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, effect: Box<dyn Effect + Send>) {
        self.effects.push(effect);
    }

    pub fn step(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.frames += 1;
        for effect in &mut self.effects {
            effect.frame(self.elapsed);
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shape_count_follows_breakpoint() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(FloatingShapes::for_viewport_width(375.0, &mut rng).shapes().len(), 10);
        assert_eq!(FloatingShapes::for_viewport_width(1440.0, &mut rng).shapes().len(), 15);
    }

    #[test]
    fn test_shapes_scattered_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let field = FloatingShapes::scatter(50, &mut rng);
        for shape in field.shapes() {
            assert!((-10.0..10.0).contains(&shape.position.x));
            assert!((0.0..PI).contains(&shape.rotation.z));
        }
    }

    #[test]
    fn test_frame_spins_by_index_parity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = FloatingShapes::scatter(4, &mut rng);
        let before = field.shapes().to_vec();
        field.frame(Duration::from_millis(16));

        let after = field.shapes();
        assert!((after[0].rotation.x - before[0].rotation.x - SPIN_PER_FRAME).abs() < 1e-12);
        assert!((after[1].rotation.x - before[1].rotation.x + SPIN_PER_FRAME).abs() < 1e-12);
        assert!((after[3].rotation.y - before[3].rotation.y - SPIN_PER_FRAME).abs() < 1e-12);
        assert!((after[1].position.y - before[1].position.y).abs() <= BOB_AMPLITUDE);
    }

    #[test]
    fn test_cube_tilt() {
        let mut cube = TiltCube::default();
        cube.point_at(0.5, 0.5);
        assert_eq!(cube.css_transform(), "rotateX(0deg) rotateY(0deg)");
        cube.point_at(1.0, 0.0);
        assert_eq!(cube.rotate_x_deg, -15.0);
        assert_eq!(cube.rotate_y_deg, 15.0);
    }

    #[test]
    fn test_loop_drives_every_effect() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut animation = AnimationLoop::new();
        animation.add(Box::new(FloatingShapes::scatter(3, &mut rng)));
        for _ in 0..5 {
            animation.step(Duration::from_millis(16));
        }
        assert_eq!(animation.frames(), 5);
        assert_eq!(animation.effect_count(), 1);
    }
}
