use crate::core::sketch::SketchWithDetails;

/// Receives change notifications produced by the sketch store
pub trait NotificationSink: Send + Sync {
    /// Called with the full, updated list whenever `recent-sketches.json` changes
    fn recent_sketches_did_change(&self, sketches: &[SketchWithDetails]);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn recent_sketches_did_change(&self, sketches: &[SketchWithDetails]) {
        log::info!(
            "Recently opened sketches changed: [{}]",
            sketches
                .iter()
                .map(|sketch| sketch.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}
