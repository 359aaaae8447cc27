/// Tolerant comparison of `f64` boundary arrays
///
/// Bounds read from two different meshtal blocks go through text, so the same
/// grid written as COL and as a matrix can differ in the last digit.
pub trait SliceExt<T> {
    /// Element-wise comparison within a relative tolerance
    ///
    /// Slices of different lengths are never close.
    ///
    /// ```rust
    /// # use meshops_utils::SliceExt;
    /// assert!([0.0_f64, 1.0, 2.0].is_close(&[0.0, 1.0, 2.0 + 1e-12], 1e-9));
    /// assert!(![0.0_f64, 1.0].is_close(&[0.0, 1.0, 2.0], 1e-9));
    /// ```
    fn is_close(&self, other: &[T], rel_tol: T) -> bool;
}

impl SliceExt<f64> for [f64] {
    fn is_close(&self, other: &[f64], rel_tol: f64) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| {
                a == b || (a - b).abs() <= rel_tol * a.abs().max(b.abs())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[1.0, 2.0], &[1.0, 2.0], 0.0, true)]
    #[case(&[1.0, 2.0], &[1.0, 2.1], 1e-3, false)]
    #[case(&[1.0, 2.0], &[1.0, 2.000_001], 1e-3, true)]
    #[case(&[-5.0, 0.0], &[-5.0, 0.0], 1e-9, true)]
    #[case(&[0.0, 1.0], &[0.0], 1e-3, false)]
    #[case(&[], &[], 1e-3, true)]
    fn close_slices(
        #[case] left: &[f64],
        #[case] right: &[f64],
        #[case] tolerance: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(left.is_close(right, tolerance), expected);
    }
}
