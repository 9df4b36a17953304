// particle/movement.rs
// Worker-local kinematic state of a single particle

use ultraviolet::DVec3;

use super::Axis;
use crate::simulation::forces::NetForce;
use crate::simulation::integrator::Kinematics;

/// Kinematic state owned by one worker and never shared.
///
/// Acceleration and velocity are recomputed from the current tick's inputs
/// only. Displacement is the one running total; it keeps growing across
/// ticks and is what gets added to the position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Movement {
    pub force: f64,
    pub force_vec: DVec3,
    pub acceleration: f64,
    pub acceleration_vec: DVec3,
    pub velocity: f64,
    pub velocity_vec: DVec3,
    pub displacement: DVec3,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_force(&mut self, net: NetForce) {
        self.force = net.magnitude;
        self.force_vec = net.vector;
    }

    pub fn integrate_acceleration(&mut self, kinematics: &dyn Kinematics, mass: f64) {
        self.acceleration = kinematics.acceleration(self.force, mass);
        for axis in Axis::ALL {
            let a = kinematics.acceleration(axis.get(self.force_vec), mass);
            axis.set(&mut self.acceleration_vec, a);
        }
    }

    pub fn integrate_velocity(&mut self, kinematics: &dyn Kinematics, elapsed: f64) {
        self.velocity = kinematics.velocity(self.acceleration, elapsed);
        for axis in Axis::ALL {
            let v = kinematics.velocity(axis.get(self.acceleration_vec), elapsed);
            axis.set(&mut self.velocity_vec, v);
        }
    }

    pub fn integrate_displacement(&mut self, kinematics: &dyn Kinematics, elapsed: f64) {
        for axis in Axis::ALL {
            let d = axis.get(self.displacement)
                + kinematics.displacement(axis.get(self.velocity_vec), elapsed);
            axis.set(&mut self.displacement, d);
        }
    }

    /// Run the three integration stages for one tick.
    pub fn integrate(&mut self, kinematics: &dyn Kinematics, mass: f64, elapsed: f64) {
        self.integrate_acceleration(kinematics, mass);
        self.integrate_velocity(kinematics, elapsed);
        self.integrate_displacement(kinematics, elapsed);
    }
}
