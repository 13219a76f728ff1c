//! Ray tests against the scene: crosshair targeting and hitscan shooting.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;

/// Limits for crosshair targeting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingParams {
    /// Nearest projection distance along the ray.
    pub min_distance: f32,
    /// Farthest projection distance along the ray.
    pub max_distance: f32,
    /// Largest perpendicular distance from the ray.
    pub tolerance: f32,
}

impl Default for TargetingParams {
    fn default() -> Self {
        Self {
            min_distance: 0.1,
            max_distance: 5.0,
            tolerance: 1.0,
        }
    }
}

/// Something the crosshair may land on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub id: EntityId,
    pub position: Vec3,
    /// Per-entity reach, further capping `max_distance`.
    pub range: f32,
}

/// Pick the candidate nearest along the ray.
///
/// Candidates whose projection onto the ray falls outside
/// `[min_distance, min(max_distance, range)]`, or that sit farther than
/// `tolerance` from the ray, are skipped. Among the rest the smallest
/// projection distance wins; on an exact tie the earlier candidate wins.
/// Returns the winner and its projection distance.
pub fn closest_interactable(
    origin: Vec3,
    direction: Vec3,
    candidates: impl IntoIterator<Item = TargetCandidate>,
    params: &TargetingParams,
) -> Option<(EntityId, f32)> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut best: Option<(EntityId, f32)> = None;
    for candidate in candidates {
        let to_target = candidate.position - origin;
        let along = to_target.dot(dir);
        let reach = params.max_distance.min(candidate.range);
        if along < params.min_distance || along > reach {
            continue;
        }
        let perpendicular = (to_target - dir * along).length();
        if perpendicular > params.tolerance {
            continue;
        }
        if best.map_or(true, |(_, d)| along < d) {
            best = Some((candidate.id, along));
        }
    }
    best
}

/// Limits for hitscan shots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotParams {
    /// Distance between samples along the ray.
    pub step: f32,
    pub range: f32,
    /// Horizontal radius of a person's hitbox.
    pub hit_radius: f32,
}

impl Default for ShotParams {
    fn default() -> Self {
        Self {
            step: 0.1,
            range: 50.0,
            hit_radius: 0.5,
        }
    }
}

/// A vertical cylinder standing on `base`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub id: EntityId,
    pub base: Vec3,
    pub height: f32,
}

impl Hitbox {
    pub fn contains(&self, point: Vec3, radius: f32) -> bool {
        let dx = point.x - self.base.x;
        let dz = point.z - self.base.z;
        dx * dx + dz * dz <= radius * radius
            && point.y >= self.base.y
            && point.y <= self.base.y + self.height
    }
}

/// March the ray in fixed steps and return the hitbox struck at the smallest
/// distance, with that distance.
pub fn raycast_people(
    origin: Vec3,
    direction: Vec3,
    hitboxes: impl IntoIterator<Item = Hitbox>,
    params: &ShotParams,
) -> Option<(EntityId, f32)> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO || !(params.step > 0.0) {
        return None;
    }
    let steps = (params.range / params.step).floor() as u32;

    let mut best: Option<(EntityId, f32)> = None;
    for hitbox in hitboxes {
        for i in 0..=steps {
            let t = i as f32 * params.step;
            if best.is_some_and(|(_, d)| t >= d) {
                break;
            }
            if hitbox.contains(origin + dir * t, params.hit_radius) {
                best = Some((hitbox.id, t));
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u32, position: Vec3) -> TargetCandidate {
        TargetCandidate {
            id: EntityId(id),
            position,
            range: 5.0,
        }
    }

    #[test]
    fn nearer_along_ray_wins_regardless_of_order() {
        let params = TargetingParams::default();
        let near = candidate(1, Vec3::new(0.0, 0.0, -2.0));
        let far = candidate(2, Vec3::new(0.0, 0.0, -4.0));

        let a = closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [near, far], &params);
        let b = closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [far, near], &params);
        assert_eq!(a.map(|(id, _)| id), Some(EntityId(1)));
        assert_eq!(b.map(|(id, _)| id), Some(EntityId(1)));
        assert!((a.unwrap().1 - 2.0).abs() < 1e-6);
    }

    #[test]
    fn off_center_near_loses_to_centered_far() {
        let params = TargetingParams::default();
        let off_center = candidate(1, Vec3::new(1.5, 0.0, -1.0));
        let centered = candidate(2, Vec3::new(0.0, 0.0, -4.5));
        let hit = closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [off_center, centered], &params);
        assert_eq!(hit.map(|(id, _)| id), Some(EntityId(2)));
    }

    #[test]
    fn distance_window_is_enforced() {
        let params = TargetingParams::default();
        let too_close = candidate(1, Vec3::new(0.0, 0.0, -0.05));
        let too_far = candidate(2, Vec3::new(0.0, 0.0, -5.5));
        let behind = candidate(3, Vec3::new(0.0, 0.0, 2.0));
        let hit = closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [too_close, too_far, behind], &params);
        assert!(hit.is_none());
    }

    #[test]
    fn short_range_caps_reach() {
        let params = TargetingParams::default();
        let mut c = candidate(1, Vec3::new(0.0, 0.0, -3.0));
        c.range = 2.0;
        assert!(closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [c], &params).is_none());
    }

    #[test]
    fn exact_tie_goes_to_first() {
        let params = TargetingParams::default();
        let a = candidate(1, Vec3::new(0.5, 0.0, -3.0));
        let b = candidate(2, Vec3::new(-0.5, 0.0, -3.0));
        let hit = closest_interactable(Vec3::ZERO, Vec3::NEG_Z, [a, b], &params);
        assert_eq!(hit.map(|(id, _)| id), Some(EntityId(1)));
    }

    #[test]
    fn shot_hits_nearest_person() {
        let params = ShotParams::default();
        let eye = Vec3::new(0.0, 1.6, 0.0);
        let near = Hitbox {
            id: EntityId(1),
            base: Vec3::new(0.0, 0.0, -6.0),
            height: 1.8,
        };
        let far = Hitbox {
            id: EntityId(2),
            base: Vec3::new(0.2, 0.0, -12.0),
            height: 1.8,
        };
        let hit = raycast_people(eye, Vec3::NEG_Z, [far, near], &params).unwrap();
        assert_eq!(hit.0, EntityId(1));
        assert!((hit.1 - 5.5).abs() < 0.11);
    }

    #[test]
    fn shot_over_a_short_person_misses() {
        let params = ShotParams::default();
        let short = Hitbox {
            id: EntityId(1),
            base: Vec3::new(0.0, 0.0, -4.0),
            height: 1.0,
        };
        assert!(raycast_people(Vec3::new(0.0, 1.6, 0.0), Vec3::NEG_Z, [short], &params).is_none());
    }

    #[test]
    fn out_of_range_is_a_miss() {
        let params = ShotParams::default();
        let distant = Hitbox {
            id: EntityId(1),
            base: Vec3::new(0.0, 0.0, -80.0),
            height: 1.8,
        };
        assert!(raycast_people(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, [distant], &params).is_none());
    }
}
