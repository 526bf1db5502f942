/// Lifetime max/min of every reading seen by the process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningExtremes {
    max: Option<f64>,
    min: Option<f64>,
}

impl RunningExtremes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, value: f64) -> bool {
        let raised = self.max.map_or(true, |m| value > m);
        if raised {
            self.max = Some(value);
        }
        if self.min.map_or(true, |m| value < m) {
            self.min = Some(value);
        }
        raised
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }
}
