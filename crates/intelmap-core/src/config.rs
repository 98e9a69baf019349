use serde::Deserialize;

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of segments in each great-circle flight arc.
    pub arc_segments: usize,
    /// Concurrent lookups per geocoding batch.
    pub geocode_batch_size: usize,
    /// Characters of entry text kept in connection hover detail.
    pub hover_excerpt_len: usize,
    /// Degrees added to the primary person's position for vehicle markers.
    pub vehicle_offset_deg: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            arc_segments: 50,
            geocode_batch_size: crate::geocode::DEFAULT_BATCH_SIZE,
            hover_excerpt_len: 180,
            vehicle_offset_deg: 0.0012,
        }
    }
}
