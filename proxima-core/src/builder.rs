//! Builder utilities for configuring the clustering engine.
//!
//! Exposes the linkage, threshold and pivot-counting surface used before
//! constructing [`Hac`] instances.

use crate::{hac::Hac, linkage::Linkage};

/// Controls how a pivot's own members count towards the target size.
///
/// # Examples
/// ```
/// use proxima_core::PivotCounting;
///
/// assert_eq!(PivotCounting::default(), PivotCounting::IncludesPivot);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PivotCounting {
    /// The pivot cluster stops growing once it holds `target_size` members
    /// in total, so at most `target_size - |pivot|` nodes are returned.
    #[default]
    IncludesPivot,
    /// The pivot cluster keeps growing until `target_size` nodes have been
    /// acquired in addition to the pivot members.
    ExcludesPivot,
}

/// Configures and constructs [`Hac`] instances.
///
/// # Examples
/// ```
/// use proxima_core::{HacBuilder, Linkage, PivotCounting};
///
/// let hac = HacBuilder::new()
///     .with_linkage(Linkage::Maximum)
///     .with_threshold(100)
///     .with_pivot_counting(PivotCounting::ExcludesPivot)
///     .build();
/// assert_eq!(hac.linkage(), Linkage::Maximum);
/// assert_eq!(hac.threshold(), 100);
/// assert_eq!(hac.pivot_counting(), PivotCounting::ExcludesPivot);
/// ```
#[derive(Clone, Debug)]
pub struct HacBuilder {
    linkage: Linkage,
    threshold: u64,
    pivot_counting: PivotCounting,
}

impl Default for HacBuilder {
    fn default() -> Self {
        Self {
            linkage: Linkage::Average,
            threshold: u64::MAX,
            pivot_counting: PivotCounting::IncludesPivot,
        }
    }
}

impl HacBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use proxima_core::{HacBuilder, Linkage, PivotCounting};
    ///
    /// let builder = HacBuilder::new();
    /// assert_eq!(builder.linkage(), Linkage::Average);
    /// assert_eq!(builder.threshold(), u64::MAX);
    /// assert_eq!(builder.pivot_counting(), PivotCounting::IncludesPivot);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the linkage used to cost merges.
    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Returns the configured linkage.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Sets the inclusive upper bound on a single merge's cost.
    ///
    /// Pass `u64::MAX` to disable filtering.
    ///
    /// # Examples
    /// ```
    /// use proxima_core::HacBuilder;
    ///
    /// let builder = HacBuilder::new().with_threshold(0);
    /// assert_eq!(builder.threshold(), 0);
    /// ```
    #[must_use]
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Returns the configured merge threshold.
    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Chooses how pivot members count towards the target size.
    #[must_use]
    pub fn with_pivot_counting(mut self, counting: PivotCounting) -> Self {
        self.pivot_counting = counting;
        self
    }

    /// Returns the configured pivot counting mode.
    #[must_use]
    pub fn pivot_counting(&self) -> PivotCounting {
        self.pivot_counting
    }

    /// Constructs a [`Hac`] engine.
    ///
    /// Every combination of parameters is valid, so building cannot fail.
    #[must_use]
    pub fn build(self) -> Hac {
        Hac::new(self.linkage, self.threshold, self.pivot_counting)
    }
}
