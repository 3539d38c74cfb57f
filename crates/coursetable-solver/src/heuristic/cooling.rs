//! Annealing temperature schedules.

use std::fmt::Debug;

pub trait TemperatureSchedule: Send + Sync + Debug {
    fn temperature(&self, step: u32) -> f64;
    fn min_temp(&self) -> f64;
    fn max_temp(&self) -> f64;
}

/// `t_max * exp(-ln(t_max / t_min) * step / steps)`: starts at `t_max`
/// and reaches `t_min` after `steps` steps.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialCooling {
    pub t_max: f64,
    pub t_min: f64,
    pub steps: u32,
}

impl ExponentialCooling {
    pub fn new(t_max: f64, t_min: f64, steps: u32) -> Self {
        Self { t_max, t_min, steps }
    }
}

impl TemperatureSchedule for ExponentialCooling {
    fn temperature(&self, step: u32) -> f64 {
        let t_factor = -(self.t_max / self.t_min).ln();
        self.t_max * (t_factor * f64::from(step) / f64::from(self.steps.max(1))).exp()
    }

    fn min_temp(&self) -> f64 {
        self.t_min
    }

    fn max_temp(&self) -> f64 {
        self.t_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn endpoints() {
        let schedule = ExponentialCooling::new(5.0, 1.3, 5);
        assert!(approx_eq(schedule.temperature(0), 5.0, 1e-12));
        assert!(approx_eq(schedule.temperature(5), 1.3, 1e-12));
    }

    #[test]
    fn strictly_decreasing() {
        let schedule = ExponentialCooling::new(5.0, 1.3, 5);
        let mut prev = schedule.temperature(0);
        for step in 1..=10 {
            let cur = schedule.temperature(step);
            assert!(cur < prev, "temperature rose at step {step}: {prev} -> {cur}");
            prev = cur;
        }
        assert!(schedule.temperature(6) < schedule.min_temp());
    }
}
