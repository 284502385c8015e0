//! Multiplicative noise for continuous columns.

use crate::utils::series_to_f64;
use polars::prelude::*;
use rand::Rng;

/// Perturb `value` by a factor drawn from `Uniform[-level, level)`.
pub fn perturb<R: Rng + ?Sized>(value: f64, level: f64, rng: &mut R) -> f64 {
    if level == 0.0 {
        return value;
    }
    value + value * rng.gen_range(-level..level)
}

/// Apply independent multiplicative noise to every value of a column.
///
/// Each value `v` becomes `v + v * u`, with a fresh `u` per value.
/// Missing values stay missing and consume no random draw. The result is Float64.
pub fn add_noise<R: Rng + ?Sized>(
    series: &Series,
    level: f64,
    rng: &mut R,
) -> PolarsResult<Series> {
    let noised: Vec<Option<f64>> = series_to_f64(series)?
        .into_iter()
        .map(|v| v.map(|x| perturb(x, level, rng)))
        .collect();
    Ok(Series::new(series.name().clone(), noised))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::non_null_f64;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_noise_stays_within_bounds() {
        let original = vec![36.0788, -81.1781, 48.8878, 0.0, 1_000.0];
        let series = Series::new("lat".into(), original.clone());
        let mut rng = StdRng::seed_from_u64(7);

        let noised = non_null_f64(&add_noise(&series, 0.1, &mut rng).unwrap()).unwrap();

        for (v, n) in original.iter().zip(&noised) {
            let (lo, hi) = if *v >= 0.0 {
                (v * 0.9, v * 1.1)
            } else {
                (v * 1.1, v * 0.9)
            };
            assert!(*n >= lo && *n <= hi, "{} escaped [{}, {}] for {}", n, lo, hi, v);
        }
        assert_eq!(noised[3], 0.0);
    }

    #[test]
    fn test_noise_is_reproducible_with_seed() {
        let series = Series::new("long".into(), &[-81.17, -118.18, -112.26]);

        let first = add_noise(&series, 0.1, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = add_noise(&series, 0.1, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(non_null_f64(&first).unwrap(), non_null_f64(&second).unwrap());
    }

    #[test]
    fn test_noise_changes_values() {
        let series = Series::new("merch_lat".into(), &[33.98, 39.45, 40.49]);
        let noised = add_noise(&series, 0.1, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_ne!(non_null_f64(&series).unwrap(), non_null_f64(&noised).unwrap());
    }

    #[test]
    fn test_zero_noise_level_is_identity() {
        let series = Series::new("lat".into(), &[1.5, -2.5]);
        let noised = add_noise(&series, 0.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(non_null_f64(&noised).unwrap(), vec![1.5, -2.5]);
    }

    #[test]
    fn test_noise_keeps_nulls() {
        let series = Series::new("lat".into(), &[Some(1.0), None]);
        let noised = add_noise(&series, 0.1, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(noised.null_count(), 1);
        assert_eq!(noised.dtype(), &DataType::Float64);
    }
}
