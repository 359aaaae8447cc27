use crate::f;

/// Printing of optional values
pub trait OptionExt {
    /// The displayed value, or "none"
    ///
    /// Header fields such as the title or histories are not in every file.
    ///
    /// ```rust
    /// # use meshops_utils::OptionExt;
    /// let histories: Option<f64> = Some(1e6);
    /// assert_eq!(histories.display(), "1000000");
    ///
    /// let title: Option<String> = None;
    /// assert_eq!(title.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}
