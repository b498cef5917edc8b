//! Distribution Reducers
//!
//! Pure, total transforms from fetched metadata and status into the figures
//! and series the charts render. Nothing here performs I/O or keeps state.
//!
//! ## Submodules
//! - **`distribution`**: Node usage, alive/dead split, extension histogram, cluster summary.
//! - **`series`**: `ChartSeries` conversions for each of the above and for time-series windows.

pub mod distribution;
pub mod series;
