//! Per-dimension z-score normalisation.

use linkage_core::Point;

/// Means and population standard deviations used by
/// [`z_score_normalize`], one entry per dimension.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZScoreStats {
    /// Arithmetic mean of each dimension.
    pub means: Vec<f32>,
    /// Population standard deviation of each dimension.
    pub std_devs: Vec<f32>,
}

/// Rescales each dimension to `(x - mean) / sd` using the population
/// standard deviation.
///
/// A dimension without spread is only centred, leaving it at zero instead of
/// dividing by zero. The dimension count is taken from the first point;
/// points are expected to share it.
///
/// # Examples
/// ```
/// use linkage_core::Point;
/// use linkage_providers_points::z_score_normalize;
///
/// let mut points = vec![
///     Point::new("a", vec![1.0, 5.0]),
///     Point::new("b", vec![3.0, 5.0]),
/// ];
/// let stats = z_score_normalize(&mut points);
///
/// assert_eq!(stats.means, [2.0, 5.0]);
/// assert_eq!(stats.std_devs, [1.0, 0.0]);
/// assert_eq!(points[0].coordinates(), [-1.0, 0.0]);
/// assert_eq!(points[1].coordinates(), [1.0, 0.0]);
/// ```
pub fn z_score_normalize(points: &mut [Point]) -> ZScoreStats {
    let Some(first) = points.first() else {
        return ZScoreStats::default();
    };
    let dimension = first.coordinates().len();
    let count = points.len() as f64;

    let mut sums = vec![0.0_f64; dimension];
    for point in points.iter() {
        for (sum, &value) in sums.iter_mut().zip(point.coordinates()) {
            *sum += f64::from(value);
        }
    }
    let means: Vec<f64> = sums.into_iter().map(|sum| sum / count).collect();

    let mut squares = vec![0.0_f64; dimension];
    for point in points.iter() {
        for ((square, &value), mean) in squares.iter_mut().zip(point.coordinates()).zip(&means) {
            let diff = f64::from(value) - mean;
            *square += diff * diff;
        }
    }
    let std_devs: Vec<f64> = squares
        .into_iter()
        .map(|square| (square / count).sqrt())
        .collect();

    for point in points.iter_mut() {
        for ((value, mean), sd) in point.coordinates_mut().iter_mut().zip(&means).zip(&std_devs) {
            let centred = f64::from(*value) - mean;
            let scaled = if *sd > 0.0 { centred / sd } else { centred };
            *value = scaled as f32;
        }
    }

    ZScoreStats {
        means: means.into_iter().map(|mean| mean as f32).collect(),
        std_devs: std_devs.into_iter().map(|sd| sd as f32).collect(),
    }
}
