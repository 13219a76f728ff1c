//! Collision-aware horizontal movement with wall sliding.

use glam::Vec3;

/// How many times a blocked move is re-projected before giving up.
pub const MAX_SLIDE_ITERATIONS: usize = 3;

const EPSILON: f32 = 1e-5;

/// Resolve a horizontal move from `start` by `delta`.
///
/// `contacts` reports the surface normals penetrated by the mover when
/// placed at a candidate position. Each normal the motion pushes into is
/// projected out of the motion, so the mover slides along the surface. A move
/// still blocked after [`MAX_SLIDE_ITERATIONS`] is rejected and `start` is
/// returned.
pub fn slide_move<F>(start: Vec3, delta: Vec3, mut contacts: F) -> Vec3
where
    F: FnMut(Vec3) -> Vec<Vec3>,
{
    let mut motion = Vec3::new(delta.x, 0.0, delta.z);
    if motion.length_squared() < EPSILON * EPSILON {
        return start;
    }

    for _ in 0..MAX_SLIDE_ITERATIONS {
        let candidate = start + motion;
        let blocking = blocking_normals(motion, contacts(candidate));
        if blocking.is_empty() {
            return candidate;
        }
        for normal in blocking {
            let into = motion.dot(normal);
            if into < 0.0 {
                motion -= normal * into;
            }
        }
        motion.y = 0.0;
        if motion.length_squared() < EPSILON * EPSILON {
            return start;
        }
    }

    let candidate = start + motion;
    if blocking_normals(motion, contacts(candidate)).is_empty() {
        candidate
    } else {
        start
    }
}

/// Normals that `motion` drives into. Touching a surface while moving along
/// or away from it does not block.
fn blocking_normals(motion: Vec3, normals: Vec<Vec3>) -> Vec<Vec3> {
    normals
        .into_iter()
        .filter(|n| motion.dot(*n) < -EPSILON)
        .collect()
}

/// Yaw-relative move direction from WASD-style axes.
/// `forward` and `strafe` are in [-1, 1]; yaw 0 faces -Z.
pub fn move_direction(yaw: f32, forward: f32, strafe: f32) -> Vec3 {
    let fwd = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());
    (fwd * forward + right * strafe).normalize_or_zero()
}
