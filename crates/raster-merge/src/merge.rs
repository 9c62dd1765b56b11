//! The merge engine.
//!
//! Sources are placed on a single output grid and composited in input
//! order. A destination pixel is overwritten only where the source pixel is
//! valid, so later sources win wherever several contribute data.

use ndarray::{s, Array3, Zip};
use num_traits::Zero;
use raster_core::{
    array_bounds, nodata_as, quantize, window, Affine, Bounds, MaskedArray, Pixel, Rounding,
    Validity, Window,
};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::config::{MergeConfig, NodataPolicy};
use crate::error::{MergeError, Result};
use crate::source::RasterSource;
use crate::types::{MergeOptions, MergeWarning, Mosaic, Resolution};

/// The output grid of a merge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OutputGrid {
    transform: Affine,
    rows: usize,
    cols: usize,
    bounds: Bounds,
}

impl OutputGrid {
    /// Snap `bounds` to whole pixels of size `res`, anchored at the top-left corner.
    fn new(bounds: Bounds, res: Resolution) -> Result<Self> {
        let finite = [bounds.left, bounds.bottom, bounds.right, bounds.top]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.is_empty() {
            return Err(MergeError::invalid_bounds(format!("{} has no area", bounds)));
        }

        let cols = quantize(bounds.width() / res.x, Rounding::Ceil);
        let rows = quantize(bounds.height() / res.y, Rounding::Ceil);
        if rows <= 0 || cols <= 0 {
            return Err(MergeError::invalid_bounds(format!(
                "{} is narrower than one {}x{} pixel",
                bounds, res.x, res.y
            )));
        }

        let (rows, cols) = (rows as usize, cols as usize);
        let transform = Affine::translation(bounds.left, bounds.top) * Affine::scale(res.x, -res.y);
        Ok(Self {
            transform,
            rows,
            cols,
            bounds: array_bounds(rows, cols, &transform),
        })
    }

    fn pixels(&self, bands: usize) -> u64 {
        (bands as u64)
            .saturating_mul(self.rows as u64)
            .saturating_mul(self.cols as u64)
    }
}

/// Where one source lands on the output grid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    index: usize,
    src_window: Window,
    dst_window: Window,
}

/// Composites raster sources onto one grid.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge `sources` into a single array.
    ///
    /// The output resolution defaults to the finest source resolution and
    /// the output extent to the union of source bounds. Pixels no source
    /// writes hold the fill value: the explicit nodata if given, otherwise a
    /// source nodata picked by the configured [`NodataPolicy`], otherwise zero.
    #[instrument(skip_all, fields(sources = sources.len(), resampling = %self.config.resampling))]
    pub fn merge<S: RasterSource>(
        &self,
        sources: &[S],
        options: &MergeOptions,
    ) -> Result<Mosaic<S::Pixel>> {
        self.config.validate().map_err(MergeError::config_error)?;

        let first = sources.first().ok_or(MergeError::NoSources)?;
        let bands = first.count();
        for (index, source) in sources.iter().enumerate() {
            if source.count() != bands {
                return Err(MergeError::BandMismatch {
                    index,
                    expected: bands,
                    found: source.count(),
                });
            }
        }

        let res = output_resolution(sources, options.res)?;
        let requested = match options.bounds {
            Some(bounds) => bounds,
            None => {
                let footprints: Vec<Bounds> = sources.iter().map(|s| s.bounds()).collect();
                Bounds::union_all(&footprints).ok_or(MergeError::NoSources)?
            }
        };
        let grid = OutputGrid::new(requested, res)?;
        if grid.pixels(bands) > self.config.max_output_pixels {
            return Err(MergeError::invalid_bounds(format!(
                "output of {} bands x {} rows x {} cols exceeds the limit of {} pixels",
                bands, grid.rows, grid.cols, self.config.max_output_pixels
            )));
        }
        debug!(
            rows = grid.rows,
            cols = grid.cols,
            res_x = res.x,
            res_y = res.y,
            bounds = %grid.bounds,
            "output grid"
        );

        let mut warnings = Vec::new();
        // A fill the pixel type cannot hold falls back to zero, and the
        // mosaic reports zero as its nodata.
        let (fill, nodata) = match self.fill_value(sources, options.nodata, &mut warnings) {
            Some(value) => match nodata_as::<S::Pixel>(value) {
                Some(fill) => (fill, Some(value)),
                None => {
                    emit(
                        &mut warnings,
                        MergeWarning::FillOutOfRange {
                            value,
                            dtype: std::any::type_name::<S::Pixel>(),
                        },
                    );
                    (<S::Pixel as Zero>::zero(), Some(0.0))
                }
            },
            None => (<S::Pixel as Zero>::zero(), None),
        };

        let mut placements = Vec::with_capacity(sources.len());
        for (index, source) in sources.iter().enumerate() {
            match place(index, source, &grid)? {
                Some(placement) => placements.push(placement),
                None if self.config.skip_disjoint => {
                    emit(&mut warnings, MergeWarning::SourceSkipped { index })
                }
                None => return Err(MergeError::SourceOutsideExtent { index }),
            }
        }

        let mut canvas = Array3::from_elem((bands, grid.rows, grid.cols), fill);
        let read = |p: &Placement| {
            sources[p.index].read(&p.src_window, p.dst_window.shape(), self.config.resampling)
        };

        if self.config.parallel_reads {
            let blocks = placements
                .par_iter()
                .map(read)
                .collect::<Result<Vec<_>>>()?;
            for (placement, block) in placements.iter().zip(&blocks) {
                let source = &sources[placement.index];
                self.composite(&mut canvas, placement, block, source.nodata(), fill)?;
            }
        } else {
            for placement in &placements {
                let block = read(placement)?;
                let source = &sources[placement.index];
                self.composite(&mut canvas, placement, &block, source.nodata(), fill)?;
            }
        }

        Ok(Mosaic {
            data: canvas,
            transform: grid.transform,
            nodata,
            warnings,
        })
    }

    /// Choose the fill value, warning when sources disagree on nodata.
    fn fill_value<S: RasterSource>(
        &self,
        sources: &[S],
        explicit: Option<f64>,
        warnings: &mut Vec<MergeWarning>,
    ) -> Option<f64> {
        if explicit.is_some() {
            return explicit;
        }

        let declared: Vec<Option<f64>> = sources.iter().map(|s| s.nodata()).collect();
        let chosen = match self.config.nodata_policy {
            NodataPolicy::First => declared.first().copied().flatten(),
            NodataPolicy::MostCommon => most_common(&declared),
        };

        let agree = declared.windows(2).all(|pair| same_nodata(pair[0], pair[1]));
        if !agree {
            emit(
                warnings,
                MergeWarning::NodataMismatch {
                    values: declared,
                    chosen,
                },
            );
        }
        chosen
    }

    /// Overwrite the destination window with the valid pixels of `block`.
    fn composite<T: Pixel>(
        &self,
        canvas: &mut Array3<T>,
        placement: &Placement,
        block: &MaskedArray<T>,
        source_nodata: Option<f64>,
        fill: T,
    ) -> Result<()> {
        let dst = &placement.dst_window;
        let (rows, cols) = dst.shape();
        let expected = (canvas.dim().0, rows, cols);
        if block.shape() != expected {
            return Err(MergeError::read_failed(format!(
                "source {} returned {:?}, expected {:?}",
                placement.index,
                block.shape(),
                expected
            )));
        }

        let validity = match (block.mask(), source_nodata) {
            (Some(_), _) => block.validity(),
            (None, Some(_)) => Validity::from_nodata(source_nodata),
            (None, None) if self.config.implicit_nodata => Validity::Nodata(fill),
            (None, None) => Validity::All,
        };

        let (r0, c0) = (dst.rows.0 as usize, dst.cols.0 as usize);
        let mut region = canvas.slice_mut(s![.., r0..r0 + rows, c0..c0 + cols]);
        Zip::indexed(&mut region)
            .and(block.data())
            .for_each(|(b, r, c), out, &value| {
                if validity.is_valid(value, &[b, r, c]) {
                    *out = value;
                }
            });
        Ok(())
    }
}

/// Merge `sources` with the default configuration.
///
/// Returns the composited array together with its transform; see
/// [`Merger::merge`] for how each parameter defaults.
pub fn merge<S: RasterSource>(
    sources: &[S],
    bounds: Option<Bounds>,
    res: Option<Resolution>,
    nodata: Option<f64>,
) -> Result<Mosaic<S::Pixel>> {
    Merger::default().merge(sources, &MergeOptions { bounds, res, nodata })
}

/// Finest source resolution per axis, unless one was requested.
fn output_resolution<S: RasterSource>(
    sources: &[S],
    requested: Option<Resolution>,
) -> Result<Resolution> {
    let res = requested.unwrap_or_else(|| {
        let (x, y) = sources
            .iter()
            .map(|s| s.res())
            .fold((f64::INFINITY, f64::INFINITY), |(x, y), (sx, sy)| {
                (x.min(sx), y.min(sy))
            });
        Resolution::new(x, y)
    });

    if !res.is_valid() {
        return Err(MergeError::invalid_resolution(format!(
            "({}, {}) must be finite and positive",
            res.x, res.y
        )));
    }
    Ok(res)
}

/// Locate `source` on the output grid, or `None` if it does not overlap it.
fn place<S: RasterSource>(index: usize, source: &S, grid: &OutputGrid) -> Result<Option<Placement>> {
    let Some(overlap) = source.bounds().intersection(&grid.bounds) else {
        return Ok(None);
    };

    let dst_window = window(&overlap, &grid.transform)?.crop(grid.rows, grid.cols);
    if dst_window.is_empty() {
        return Ok(None);
    }
    let src_window = source.window(&overlap)?;

    debug!(
        index,
        src_window = %src_window,
        dst_window = %dst_window,
        "placing source"
    );
    Ok(Some(Placement {
        index,
        src_window,
        dst_window,
    }))
}

fn same_nodata(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => raster_core::same_value(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// The most frequently declared value; ties go to the earliest.
fn most_common(values: &[Option<f64>]) -> Option<f64> {
    let mut best: Option<(Option<f64>, usize)> = None;
    for value in values {
        let count = values.iter().filter(|v| same_nodata(**v, *value)).count();
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((*value, count));
        }
    }
    best.and_then(|(value, _)| value)
}

fn emit(warnings: &mut Vec<MergeWarning>, warning: MergeWarning) {
    warn!("{}", warning);
    warnings.push(warning);
}
