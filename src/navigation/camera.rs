//! Corridor geometry and camera framing.
//!
//! Exhibits hang along the negative Z axis, one per station. The camera stands at a
//! station looking down the corridor; approaching an exhibit moves it closer and tilts it
//! up a little. Only pitch ever changes, never yaw or roll.

use cgmath::{Vector3, Zero};

/// Geometry of the corridor, in scene units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneLayout {
    /// Distance between two viewing stations along the corridor.
    pub station_spacing: f32,
    /// Height of the camera above the floor.
    pub eye_height: f32,
    /// How far the camera walks forward when approaching an exhibit.
    pub approach_offset: f32,
    /// Upward tilt (radians) while approached.
    pub approach_pitch: f32,
    /// Height of exhibit centres above the floor.
    pub exhibit_height: f32,
    /// Distance from a station to the exhibit it faces.
    pub exhibit_offset: f32,
    /// Distance from the last station to the portal.
    pub portal_offset: f32,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            station_spacing: 8.0,
            eye_height: 1.6,
            approach_offset: 2.0,
            approach_pitch: 0.1,
            exhibit_height: 1.5,
            exhibit_offset: 4.0,
            portal_offset: 8.0,
        }
    }
}

/// Camera rotation as Euler angles in radians.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Where the presentation layer should move the camera to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraTarget {
    pub position: Vector3<f32>,
    pub orientation: Orientation,
}

impl SceneLayout {
    /// Z coordinate of the station at `position`.
    fn station_z(&self, position: usize) -> f32 {
        -(position as f32) * self.station_spacing
    }

    /// Camera framing for a station. `approached` brings the camera closer and tilts it.
    pub fn camera_target(&self, position: usize, approached: bool) -> CameraTarget {
        let base_z = self.station_z(position);

        if approached {
            CameraTarget {
                position: Vector3::new(0.0, self.eye_height, base_z - self.approach_offset),
                orientation: Orientation { pitch: self.approach_pitch, yaw: 0.0, roll: 0.0 },
            }
        } else {
            CameraTarget {
                position: Vector3::new(0.0, self.eye_height, base_z),
                orientation: Orientation::default(),
            }
        }
    }

    /// Centre of the exhibit hanging at `index`.
    pub fn exhibit_placement(&self, index: usize) -> Vector3<f32> {
        Vector3::new(0.0, self.exhibit_height, self.station_z(index) - self.exhibit_offset)
    }

    /// Centre of the portal ring, present only when there is at least one exhibit.
    pub fn portal_placement(&self, len: usize) -> Option<Vector3<f32>> {
        if len == 0 {
            return None;
        }
        Some(Vector3::new(0.0, self.exhibit_height, self.station_z(len) - self.portal_offset))
    }

    /// Distance along the corridor between a camera and the exhibit plane at `index`.
    pub fn distance_to_exhibit(&self, target: &CameraTarget, index: usize) -> f32 {
        (target.position.z - self.exhibit_placement(index).z).abs()
    }
}

impl Default for CameraTarget {
    fn default() -> Self {
        Self { position: Vector3::zero(), orientation: Orientation::default() }
    }
}
