use rand::Rng;

pub trait Sensor: Send + Sync {
    fn sample(&self) -> f64;
}

/// Uniform integral temperatures in `[low, high)` °C.
#[derive(Debug, Clone)]
pub struct SimulatedThermometer {
    low: i32,
    high: i32,
}

impl SimulatedThermometer {
    pub fn new(low: i32, high: i32) -> Self {
        assert!(low < high, "empty temperature range {low}..{high}");
        Self { low, high }
    }
}

impl Sensor for SimulatedThermometer {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen_range(self.low..self.high) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range() {
        let sensor = SimulatedThermometer::new(10, 50);
        for _ in 0..500 {
            let v = sensor.sample();
            assert!((10.0..50.0).contains(&v), "{v} out of range");
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn single_value_range() {
        let sensor = SimulatedThermometer::new(7, 8);
        assert_eq!(sensor.sample(), 7.0);
    }
}
