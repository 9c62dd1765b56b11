//! Mosaic engine for georeferenced rasters.
//!
//! Several rasters, each with its own transform and resolution, are
//! composited onto one output grid:
//!
//! ```text
//! sources ──► output resolution (finest source, or requested)
//!         ──► output bounds (union of footprints, or requested)
//!         ──► fill value (explicit nodata, or chosen from sources)
//!         ──► for each source, in order:
//!               placement window on the output grid
//!               read + resample to the window shape
//!               overwrite destination where the source is valid
//! ```
//!
//! Datasets are reached through the [`RasterSource`] trait; [`MemoryRaster`]
//! is an in-memory implementation.
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use raster_core::Affine;
//! use raster_merge::{merge, MemoryRaster};
//!
//! let west = MemoryRaster::from_2d(array![[1u8]], Affine::new(1.0, 0.0, 0.0, 0.0, -1.0, 1.0));
//! let east = MemoryRaster::from_2d(array![[2u8]], Affine::new(1.0, 0.0, 1.0, 0.0, -1.0, 1.0));
//!
//! let mosaic = merge(&[west, east], None, None, None).unwrap();
//! assert_eq!(mosaic.data, array![[[1u8, 2]]]);
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod merge;
pub mod resample;
pub mod source;
pub mod types;

pub use config::{MergeConfig, NodataPolicy};
pub use error::{MergeError, Result};
pub use memory::MemoryRaster;
pub use merge::{merge, Merger};
pub use resample::resample;
pub use source::RasterSource;
pub use types::{MergeOptions, MergeWarning, Mosaic, Resampling, Resolution};
