/// Fixed-capacity circular buffer of the most recent readings.
#[derive(Debug, Clone)]
pub struct MovingWindow {
    slots: Vec<f64>,
    cursor: usize,
}

impl MovingWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "moving window capacity must be > 0");
        Self {
            slots: vec![0.0; capacity],
            cursor: 0,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.slots[self.cursor] = value;
        self.cursor = (self.cursor + 1) % self.slots.len();
    }

    pub fn average(&self) -> f64 {
        self.slots.iter().sum::<f64>() / self.slots.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
