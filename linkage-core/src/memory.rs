//! Pre-flight memory estimation for the merge engine.
//!
//! The engine's footprint is dominated by two packed triangles of `f32`
//! distances, so the estimate is computed exactly from the structure layouts
//! rather than padded with a multiplier. Coordinates held by the data source
//! are not counted.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Size of one packed distance cell.
const F32_BYTES: u64 = 4;

/// Number of packed triangles: item distances plus cluster distances.
const TRIANGLE_COUNT: u64 = 2;

/// Per-item bookkeeping on 64-bit platforms:
///
/// - membership `next` link (`Option<usize>`, 16 bytes),
/// - membership chain head (`first`, `last`, `count`, 24 bytes),
/// - slot-to-handle entry (8 bytes) and handle-to-slot entry (16 bytes),
/// - nearest-neighbour cache entry (`Option<Nearest>`, 24 bytes),
/// - index scratch used while building the item table (8 bytes),
/// - one row of freshly computed distances (4 bytes).
const PER_ITEM_BYTES: u64 = 16 + 24 + 8 + 16 + 24 + 8 + 4;

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Returns the peak memory (in bytes) a run over `point_count` items needs
/// for the engine's working structures.
///
/// Arithmetic saturates at `u64::MAX` instead of overflowing.
///
/// # Examples
///
/// ```
/// use linkage_core::estimate_peak_bytes;
///
/// assert_eq!(estimate_peak_bytes(0), 0);
/// // Two triangles of 45 cells plus per-item bookkeeping.
/// assert_eq!(estimate_peak_bytes(10), 2 * 45 * 4 + 10 * 100);
/// ```
#[must_use]
pub fn estimate_peak_bytes(point_count: usize) -> u64 {
    if point_count == 0 {
        return 0;
    }

    let n = point_count as u64;
    let cells = n.saturating_mul(n - 1) / 2;
    let triangles = cells
        .saturating_mul(F32_BYTES)
        .saturating_mul(TRIANGLE_COUNT);
    let bookkeeping = n.saturating_mul(PER_ITEM_BYTES);

    triangles.saturating_add(bookkeeping)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Formats a byte count as a human-readable string using binary units.
///
/// Returns values like `"0 B"`, `"1.0 KiB"`, `"2.4 GiB"`; one decimal place
/// for values ≥ 1 KiB.
///
/// # Examples
///
/// ```
/// use linkage_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1023), "1023 B");
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    let (unit, divisor) = match bytes {
        b if b >= TIB => ("TiB", TIB),
        b if b >= GIB => ("GiB", GIB),
        b if b >= MIB => ("MiB", MIB),
        b if b >= KIB => ("KiB", KIB),
        _ => return format!("{bytes} B"),
    };
    format!("{:.1} {unit}", bytes as f64 / divisor as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::one(1, 100)]
    #[case::two(2, 2 * 4 + 200)]
    #[case::thousand(1_000, 2 * 499_500 * 4 + 100_000)]
    fn estimate_counts_triangles_and_bookkeeping(#[case] point_count: usize, #[case] expected: u64) {
        assert_eq!(estimate_peak_bytes(point_count), expected);
    }

    #[rstest]
    #[case::hundred_vs_thousand(100, 1_000)]
    #[case::thousand_vs_million(1_000, 1_000_000)]
    fn estimate_grows_with_point_count(#[case] n_small: usize, #[case] n_large: usize) {
        let small = estimate_peak_bytes(n_small);
        let large = estimate_peak_bytes(n_large);
        assert!(
            large > small,
            "expected n={n_large} estimate ({large}) > n={n_small} estimate ({small})"
        );
    }

    #[rstest]
    fn estimate_zero_points_returns_zero() {
        assert_eq!(estimate_peak_bytes(0), 0);
    }

    #[rstest]
    fn estimate_huge_point_count_saturates() {
        assert_eq!(estimate_peak_bytes(usize::MAX), u64::MAX);
    }

    #[rstest]
    #[case::zero(0, "0 B")]
    #[case::small(512, "512 B")]
    #[case::just_below_kib(1023, "1023 B")]
    #[case::one_kib(1024, "1.0 KiB")]
    #[case::one_and_half_kib(1536, "1.5 KiB")]
    #[case::one_mib(1_048_576, "1.0 MiB")]
    #[case::one_gib(1_073_741_824, "1.0 GiB")]
    #[case::one_tib(1_099_511_627_776, "1.0 TiB")]
    #[case::two_point_four_gib(2_576_980_378, "2.4 GiB")]
    fn format_bytes_produces_expected_output(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(input), expected);
    }
}
