//! Cosine-annealing learning-rate schedule.

/// `lr(t) = eta_min + (base - eta_min) * (1 + cos(pi * t / t_max)) / 2`, stepped once per epoch.
///
/// Unlike the warm-restart variant, `t` saturates at `t_max`.
#[derive(Debug, Clone)]
pub struct CosineAnnealing {
    base_lr: f64,
    eta_min: f64,
    t_max: usize,
    step_count: usize,
}

impl CosineAnnealing {
    pub fn new(base_lr: f64, t_max: usize, eta_min: f64) -> Self {
        Self {
            base_lr,
            eta_min,
            t_max,
            step_count: 0,
        }
    }

    /// Advance one step and return the new rate.
    pub fn step(&mut self) -> f64 {
        self.step_count = (self.step_count + 1).min(self.t_max);
        self.lr()
    }

    pub fn lr(&self) -> f64 {
        if self.t_max == 0 {
            return self.base_lr;
        }
        let t = self.step_count as f64 / self.t_max as f64;
        self.eta_min + (self.base_lr - self.eta_min) * (1.0 + (std::f64::consts::PI * t).cos()) / 2.0
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn reset(&mut self) {
        self.step_count = 0;
    }
}
