//! Synthetic series for demonstrating the charts. Never a source of real data.

use rand::Rng;

use super::series::DashboardData;
use crate::domain::{Metric, WalkParams};

pub const DEFAULT_WEEKS: usize = 7;
const WEEK_STEP: usize = 4;

/// Demo data over `weeks` periods using the thread-local RNG.
pub fn generate_demo_data(weeks: usize) -> DashboardData {
    generate_demo_data_with(&mut rand::thread_rng(), weeks)
}

pub fn generate_demo_data_with<R: Rng + ?Sized>(rng: &mut R, weeks: usize) -> DashboardData {
    let mut data = DashboardData {
        labels: (1..=weeks)
            .map(|period| format!("Week {}", period * WEEK_STEP))
            .collect(),
        ..DashboardData::default()
    };

    for metric in Metric::ALL {
        data.set_series(metric, random_walk(rng, metric.params(), weeks));
    }

    log::debug!("generated {weeks} weeks of demo data");
    data
}

// Walks on the unrounded value; each emitted sample is clamped then rounded.
fn random_walk<R: Rng + ?Sized>(rng: &mut R, params: WalkParams, len: usize) -> Vec<f64> {
    let half = params.volatility / 2.0;
    let mut value = params.start;
    let mut samples = Vec::with_capacity(len);

    for _ in 0..len {
        value = (value + rng.gen_range(-half..=half)).clamp(params.min, params.max);
        samples.push(value.round());
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn labels_step_by_four_weeks() {
        let data = generate_demo_data(DEFAULT_WEEKS);
        assert_eq!(data.labels.len(), 7);
        assert_eq!(data.labels[0], "Week 4");
        assert_eq!(data.labels[6], "Week 28");

        for weeks in 1..=20 {
            let data = generate_demo_data(weeks);
            assert_eq!(data.labels.len(), weeks);
            for (index, label) in data.labels.iter().enumerate() {
                assert_eq!(*label, format!("Week {}", 4 * (index + 1)));
            }
        }
    }

    #[test]
    fn samples_are_bounded_integers() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_demo_data_with(&mut rng, 52);
            assert_eq!(data.validate(), Ok(()));

            for metric in Metric::ALL {
                let params = metric.params();
                let values = data.series(metric).unwrap();
                assert_eq!(values.len(), 52);
                for value in values {
                    assert!(value.fract() == 0.0, "{metric:?} produced {value}");
                    assert!(
                        (params.min..=params.max).contains(value),
                        "{metric:?} produced {value}"
                    );
                }
            }
        }
    }

    #[test]
    fn steps_stay_within_volatility() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = generate_demo_data_with(&mut rng, 30);
        let values = data.series(Metric::Glucose).unwrap();
        // rounding can add at most one unit between neighbours
        for pair in values.windows(2) {
            assert!((pair[1] - pair[0]).abs() <= Metric::Glucose.params().volatility / 2.0 + 1.0);
        }
    }

    #[test]
    fn zero_weeks_yields_empty_series() {
        let data = generate_demo_data(0);
        assert!(data.labels.is_empty());
        assert!(data.series(Metric::RiskScore).is_some_and(<[f64]>::is_empty));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let first = generate_demo_data_with(&mut StdRng::seed_from_u64(42), 10);
        let second = generate_demo_data_with(&mut StdRng::seed_from_u64(42), 10);
        assert_eq!(first, second);
    }
}
