use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// Rust's own `{:e}` drops the exponent sign and padding, which makes
    /// columns of results hard to read. Works for anything implementing
    /// `LowerExp`.
    ///
    /// ```rust
    /// # use meshops_utils::ValueExt;
    /// assert_eq!((-1.0_f64).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((0.00123_f64).sci(2, 2), "1.23e-03".to_string());
    /// assert_eq!((16.0_f64).sci(3, 3), "1.600e+001".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", &self, precision = precision);

        // LowerExp always writes an 'e', fall back to the raw string regardless
        let Some((mantissa, exp)) = num.split_once('e') else {
            return num;
        };

        let (sign, exp) = match exp.strip_prefix('-') {
            Some(exp) => ('-', exp),
            None => ('+', exp),
        };

        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}
