//! CycleScope Core — the reactive recomputation and region-derivation pipeline.
//!
//! This crate contains everything below the rendering layer:
//! - Domain types (score points, indicator descriptors, parameter overrides)
//! - Score → color gradient mapping for line coloring
//! - Threshold breach run detection for shaded chart bands
//! - ROC summary table row ordering over the fixed category taxonomy
//! - The parameter state store and its derived service request payload
//! - Recompute scheduling (debounce coalescing, latest-request-wins)
//! - Preset payload translation
//! - The computation-service client boundary

pub mod domain;
pub mod gradient;
pub mod preset;
pub mod regions;
pub mod scheduler;
pub mod service;
pub mod state;
pub mod table;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the worker-thread channel
    /// boundary is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::ScorePoint>();
        require_sync::<domain::ScorePoint>();
        require_send::<domain::IndicatorDescriptor>();
        require_sync::<domain::IndicatorDescriptor>();

        require_send::<regions::Region>();
        require_sync::<regions::Region>();
        require_send::<table::DisplayRow>();
        require_sync::<table::DisplayRow>();

        require_send::<service::ComputeRequest>();
        require_sync::<service::ComputeRequest>();
        require_send::<service::ComputeResult>();
        require_sync::<service::ComputeResult>();
        require_send::<service::ServiceError>();
        require_sync::<service::ServiceError>();

        require_send::<preset::PresetPayload>();
        require_sync::<preset::PresetPayload>();
        require_send::<state::ParameterStateStore>();
        require_sync::<state::ParameterStateStore>();
    }
}
