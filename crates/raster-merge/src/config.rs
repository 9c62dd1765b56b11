//! Configuration for the merge engine.

use serde::{Deserialize, Serialize};

use crate::types::Resampling;

/// How the fill value is chosen when sources disagree on nodata and the
/// caller supplied none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodataPolicy {
    /// The first source's nodata value.
    #[default]
    First,
    /// The most frequently declared nodata value; ties go to the earliest source.
    MostCommon,
}

impl NodataPolicy {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "most_common" | "mostcommon" | "mode" => Self::MostCommon,
            _ => Self::First,
        }
    }
}

/// Configuration for the merge engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Resampling requested from sources read at a different resolution.
    pub resampling: Resampling,

    /// Read sources concurrently before compositing them in order.
    pub parallel_reads: bool,

    /// Fill value choice when sources disagree on nodata.
    pub nodata_policy: NodataPolicy,

    /// Treat pixels equal to the output fill as invalid in sources that
    /// declare neither nodata nor a mask.
    pub implicit_nodata: bool,

    /// Skip sources outside the output extent instead of failing.
    pub skip_disjoint: bool,

    /// Upper limit on `bands * rows * cols` of the output array.
    pub max_output_pixels: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            resampling: Resampling::Nearest,
            parallel_reads: false,
            nodata_policy: NodataPolicy::First,
            implicit_nodata: false,
            skip_disjoint: false,
            max_output_pixels: 1 << 32,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl MergeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MERGE_RESAMPLING") {
            config.resampling = Resampling::from_str(&val);
        }

        if let Ok(val) = std::env::var("MERGE_PARALLEL_READS") {
            config.parallel_reads = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("MERGE_NODATA_POLICY") {
            config.nodata_policy = NodataPolicy::from_str(&val);
        }

        if let Ok(val) = std::env::var("MERGE_IMPLICIT_NODATA") {
            config.implicit_nodata = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("MERGE_SKIP_DISJOINT") {
            config.skip_disjoint = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("MERGE_MAX_OUTPUT_PIXELS") {
            if let Ok(limit) = val.parse() {
                config.max_output_pixels = limit;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_output_pixels == 0 {
            return Err("max_output_pixels must be > 0".to_string());
        }

        Ok(())
    }
}
