//! Vector PID controller for per-axis error correction.
//!
//! This is peripheral to the kinematic core: a control loop may compare the
//! pose from forward kinematics against a target, feed the per-axis errors
//! in here each tick and apply the corrective outputs to the actuators. The
//! chain itself never depends on it.

use crate::kinematics_error::KinematicsError;
use nalgebra::DVector;

/// Discrete PID over a vector of per-axis errors. The integral term is
/// clamped to a configured band to keep windup in check.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: DVector<f64>,
    ki: DVector<f64>,
    kd: DVector<f64>,
    t: f64,
    max_i_out: f64,
    min_i_out: f64,
    cumulative_error: DVector<f64>,
    previous_error: DVector<f64>,
}

impl PidController {
    /// Gains must all have the same length (one entry per controlled axis),
    /// the sample period must be positive and the integral clamp band must
    /// be non-empty.
    pub fn new(
        kp: DVector<f64>,
        ki: DVector<f64>,
        kd: DVector<f64>,
        t: f64,
        min_i_out: f64,
        max_i_out: f64,
    ) -> Result<Self, KinematicsError> {
        check_gain_lengths(&kp, &ki, &kd)?;
        if t <= 0.0 {
            return Err(KinematicsError::InvalidParameter(format!(
                "sample period must be positive (got {})",
                t
            )));
        }
        if min_i_out >= max_i_out {
            return Err(KinematicsError::InvalidParameter(format!(
                "integral clamp band is empty: [{}, {}]",
                min_i_out, max_i_out
            )));
        }
        let axes = kp.len();
        Ok(PidController {
            kp,
            ki,
            kd,
            t,
            max_i_out,
            min_i_out,
            cumulative_error: DVector::zeros(axes),
            previous_error: DVector::zeros(axes),
        })
    }

    /// Number of controlled axes.
    pub fn axes(&self) -> usize {
        self.kp.len()
    }

    /// One control tick: accumulate the integral, difference the error for
    /// the derivative and return `kp∘e + clamp(ki∘Σe) + kd∘(e − e_prev)/t`.
    pub fn compensate(&mut self, errors: &DVector<f64>) -> Result<DVector<f64>, KinematicsError> {
        if errors.len() != self.axes() {
            return Err(KinematicsError::Shape {
                expected: format!("an error vector of length {}", self.axes()),
                found: format!("length {}", errors.len()),
            });
        }
        self.cumulative_error += errors;
        let d_error = (errors - &self.previous_error) / self.t;
        self.previous_error = errors.clone();

        let i_term = self
            .ki
            .component_mul(&self.cumulative_error)
            .map(|v| v.clamp(self.min_i_out, self.max_i_out));

        Ok(self.kp.component_mul(errors) + i_term + self.kd.component_mul(&d_error))
    }

    /// Replace the gains; the number of axes may not change.
    pub fn tune(
        &mut self,
        kp: DVector<f64>,
        ki: DVector<f64>,
        kd: DVector<f64>,
    ) -> Result<(), KinematicsError> {
        check_gain_lengths(&kp, &ki, &kd)?;
        if kp.len() != self.axes() {
            return Err(KinematicsError::Shape {
                expected: format!("gains for {} axes", self.axes()),
                found: format!("{} axes", kp.len()),
            });
        }
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        Ok(())
    }

    /// Zero the integral and derivative state.
    pub fn reset(&mut self) {
        self.cumulative_error = DVector::zeros(self.axes());
        self.previous_error = DVector::zeros(self.axes());
    }
}

fn check_gain_lengths(
    kp: &DVector<f64>,
    ki: &DVector<f64>,
    kd: &DVector<f64>,
) -> Result<(), KinematicsError> {
    if kp.len() == ki.len() && ki.len() == kd.len() {
        Ok(())
    } else {
        Err(KinematicsError::Shape {
            expected: format!("gain vectors of equal length (kp has {})", kp.len()),
            found: format!("ki has {}, kd has {}", ki.len(), kd.len()),
        })
    }
}
