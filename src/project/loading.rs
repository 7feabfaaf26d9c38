//! Load and edit cycles.
//!
//! A cycle strictly sequences damage tracking, re-parsing, evaluation, the
//! outline rebuild and the semantic checks. [`LoadingHandler`] guarantees at
//! most one cycle in flight: batches submitted meanwhile are coalesced in a
//! [`ChangeQueue`] and run right after.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextRange;
use tokio_util::sync::CancellationToken;

use super::file_loader::SourceDocument;
use crate::base::FileId;
use crate::hir::{ResourceId, RootDatabase, check_semantics, merge_document, scan_document};
use crate::syntax::{DocumentChange, connect_ranges};

// ============================================================================
// PROGRESS
// ============================================================================

/// Receives overall progress as a percentage with a short message.
pub trait ProgressSink {
    fn report(&self, percentage: u32, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(u32, &str),
{
    fn report(&self, percentage: u32, message: &str) {
        self(percentage, message)
    }
}

/// The weighted stages of a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Evaluation,
    Tree,
    Checks,
}

impl Stage {
    pub const fn weight(self) -> u32 {
        match self {
            Stage::Parsing => 55,
            Stage::Evaluation => 30,
            Stage::Tree => 5,
            Stage::Checks => 10,
        }
    }

    /// Sum of the weights of all earlier stages.
    const fn offset(self) -> u32 {
        match self {
            Stage::Parsing => 0,
            Stage::Evaluation => 55,
            Stage::Tree => 85,
            Stage::Checks => 90,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Stage::Parsing => "Parsing documents",
            Stage::Evaluation => "Evaluating resources",
            Stage::Tree => "Building outline",
            Stage::Checks => "Checking semantics",
        }
    }
}

/// Folds per-stage fractions into one growing percentage.
///
/// Only increases are forwarded, so the sink sees a monotonic sequence.
pub struct TotalProgress<'a> {
    sink: Option<&'a dyn ProgressSink>,
    reported: u32,
}

impl<'a> TotalProgress<'a> {
    pub fn new(sink: Option<&'a dyn ProgressSink>) -> Self {
        Self { sink, reported: 0 }
    }

    pub fn update(&mut self, stage: Stage, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let total = (stage.offset() as f32 + stage.weight() as f32 * fraction).ceil() as u32;
        let total = total.min(100);
        if total <= self.reported {
            return;
        }
        self.reported = total;
        if let Some(sink) = self.sink {
            sink.report(total, stage.message());
        }
    }

    pub fn finish(&mut self) {
        self.update(Stage::Checks, 1.0);
    }

    pub fn reported(&self) -> u32 {
        self.reported
    }
}

// ============================================================================
// HOST & QUEUE
// ============================================================================

/// Whatever owns the database a cycle runs against.
pub trait LoadingHost {
    fn db(&mut self) -> &mut RootDatabase;

    /// Called after evaluation, before the semantic checks.
    fn rebuild_tree(&mut self) {}
}

impl LoadingHost for RootDatabase {
    fn db(&mut self) -> &mut RootDatabase {
        self
    }
}

#[derive(Debug, Default)]
struct QueueState {
    in_flight: bool,
    pending: Vec<DocumentChange>,
}

/// Pending edit batches, shared between submitters.
///
/// Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct ChangeQueue {
    state: Arc<Mutex<QueueState>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `batch` to the pending one.
    ///
    /// Returns `true` when no cycle is in flight, in which case the caller
    /// owns the next cycle and must drain the queue.
    pub fn push(&self, batch: Vec<DocumentChange>) -> bool {
        let mut state = self.state.lock();
        state.pending.extend(batch);
        if state.in_flight {
            false
        } else {
            state.in_flight = true;
            true
        }
    }

    /// Take the pending batch, or release the in-flight slot when there is
    /// nothing left.
    fn next_batch(&self) -> Option<Vec<DocumentChange>> {
        let mut state = self.state.lock();
        if state.pending.is_empty() {
            state.in_flight = false;
            None
        } else {
            Some(std::mem::take(&mut state.pending))
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight
    }

    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }
}

// ============================================================================
// CYCLES
// ============================================================================

/// What one cycle did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Documents scanned and merged.
    pub parsed_documents: usize,
    /// Connected re-parse windows, summed over documents.
    pub windows: usize,
    pub evaluated: Vec<ResourceId>,
    pub checked: Vec<ResourceId>,
    /// Names of garbage-collected resources.
    pub collected: Vec<SmolStr>,
    pub cancelled: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LoadingHandler {
    queue: ChangeQueue,
}

impl LoadingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle other threads can submit batches through.
    pub fn queue(&self) -> ChangeQueue {
        self.queue.clone()
    }

    /// Load `documents` from scratch, or reload them when already tracked.
    pub fn load_documents<H: LoadingHost + ?Sized>(
        &self,
        host: &mut H,
        documents: Vec<SourceDocument>,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> CycleReport {
        let mut progress = TotalProgress::new(sink);
        let mut report = CycleReport::default();
        tracing::debug!(documents = documents.len(), "load cycle started");

        let db = host.db();
        let mut files = Vec::with_capacity(documents.len());
        for doc in documents {
            let file = match db.documents.refresh(&doc.uri, doc.text.as_str()) {
                Some(file) => file,
                None => db.documents.open(&doc.uri, doc.text),
            };
            files.push(file);
        }

        let scans: Vec<_> = {
            let db = &*db;
            files
                .par_iter()
                .map(|&file| {
                    scan_document(
                        file,
                        db.documents.text(file),
                        None,
                        db.prefixes.table(file),
                        |_| {},
                    )
                })
                .collect()
        };

        let total = scans.len().max(1) as f32;
        let mut touched = Vec::new();
        for (i, (file, scan)) in files.iter().zip(scans).enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!(remaining = files.len() - i, "load cycle cancelled");
                report.cancelled = true;
                break;
            }
            match scan {
                Ok(scanned) => {
                    let outcome = merge_document(&mut db.graph, &mut db.prefixes, scanned);
                    touched.extend(outcome.touched);
                    report.parsed_documents += 1;
                }
                Err(err) => tracing::warn!(%file, %err, "document skipped"),
            }
            progress.update(Stage::Parsing, (i + 1) as f32 / total);
        }

        let ids = live_unique(db, touched);
        self.finish_cycle(host, ids, None, &mut progress, &mut report);
        report
    }

    /// Apply `batch` and run edit cycles until the queue is drained.
    ///
    /// While another cycle is in flight the batch is only queued and the
    /// returned list is empty.
    pub fn submit_changes<H: LoadingHost + ?Sized>(
        &self,
        host: &mut H,
        batch: Vec<DocumentChange>,
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Vec<CycleReport> {
        if !self.queue.push(batch) {
            tracing::debug!("cycle in flight, batch queued");
            return Vec::new();
        }
        let mut reports = Vec::new();
        while let Some(pending) = self.queue.next_batch() {
            reports.push(self.run_edit_cycle(host, &pending, sink, cancel));
        }
        reports
    }

    fn run_edit_cycle<H: LoadingHost + ?Sized>(
        &self,
        host: &mut H,
        batch: &[DocumentChange],
        sink: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> CycleReport {
        let mut progress = TotalProgress::new(sink);
        let mut report = CycleReport::default();
        tracing::debug!(documents = batch.len(), "edit cycle started");

        let db = host.db();
        let mut affected = FxHashSet::default();
        let mut windows: IndexMap<FileId, Vec<TextRange>> = IndexMap::new();
        for dc in batch {
            let Some(file) = db.documents.file_id(&dc.uri) else {
                tracing::warn!(uri = %dc.uri, "change to untracked document ignored");
                continue;
            };
            let Some(document) = db.documents.get(file) else {
                continue;
            };
            let impact = db.graph.new_locations_to_parse(file, &dc.changes, document);

            let file_windows = windows.entry(file).or_default();
            for change in &dc.changes {
                for window in file_windows.iter_mut() {
                    *window = change.adjust_range(*window);
                }
                db.diagnostics.adjust(file, change);
                db.documents.apply_change(file, change);
            }
            file_windows.extend(impact.windows);
            affected.extend(impact.affected);
        }

        let mut affected: Vec<ResourceId> = affected.into_iter().collect();
        affected.sort();
        let mut stale = Vec::new();
        let mut seen = FxHashSet::default();
        for &id in &affected {
            stale.extend(db.graph.subtree(id).into_iter().filter(|&s| seen.insert(s)));
        }

        db.graph.reset_resource_evaluations(&affected);
        report
            .collected
            .extend(db.graph.remove_resources_without_occurrence_or_reference());

        let total = windows.len().max(1) as f32;
        let mut touched = Vec::new();
        for (i, (file, ranges)) in windows.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!("edit cycle cancelled");
                report.cancelled = true;
                break;
            }
            let ranges = connect_ranges(ranges);
            report.windows += ranges.len();
            let parsed = db.parse_document(file, Some(&ranges), |f| {
                progress.update(Stage::Parsing, (i as f32 + f) / total)
            });
            match parsed {
                Ok(outcome) => {
                    touched.extend(outcome.touched);
                    report.parsed_documents += 1;
                }
                Err(err) => tracing::warn!(%file, %err, "document skipped"),
            }
        }
        progress.update(Stage::Parsing, 1.0);

        affected.extend(touched);
        let ids = live_unique(db, affected);
        let stale: Vec<ResourceId> = stale.into_iter().filter(|&id| db.graph.contains(id)).collect();
        self.finish_cycle(host, ids, Some(stale), &mut progress, &mut report);
        report
    }

    /// Evaluate, collect, rebuild the outline and check `ids`.
    ///
    /// `stale` holds resources whose cached descriptions may be outdated;
    /// `None` means the whole graph is checked.
    fn finish_cycle<H: LoadingHost + ?Sized>(
        &self,
        host: &mut H,
        ids: Vec<ResourceId>,
        stale: Option<Vec<ResourceId>>,
        progress: &mut TotalProgress<'_>,
        report: &mut CycleReport,
    ) {
        let db = host.db();
        db.graph
            .evaluate_predicate_objects(&ids, |f| progress.update(Stage::Evaluation, f));
        report
            .collected
            .extend(db.graph.remove_resources_without_occurrence_or_reference());
        if let Some(stale) = &stale {
            let stale: Vec<ResourceId> =
                stale.iter().copied().filter(|&id| db.graph.contains(id)).collect();
            db.graph.refresh_descriptions(&stale);
        }
        report.evaluated = ids.into_iter().filter(|&id| db.graph.contains(id)).collect();
        progress.update(Stage::Evaluation, 1.0);

        host.rebuild_tree();
        progress.update(Stage::Tree, 1.0);

        let db = host.db();
        let subset = stale.is_some().then_some(report.evaluated.as_slice());
        report.checked = check_semantics(&db.graph, &mut db.diagnostics, subset, |f| {
            progress.update(Stage::Checks, f)
        });
        db.diagnostics.refresh_locations(&db.documents);
        progress.finish();
        tracing::debug!(
            parsed = report.parsed_documents,
            windows = report.windows,
            evaluated = report.evaluated.len(),
            collected = report.collected.len(),
            diagnostics = db.diagnostics.len(),
            "cycle finished"
        );
    }
}

/// Sorted, deduplicated and still alive.
fn live_unique(db: &RootDatabase, ids: Vec<ResourceId>) -> Vec<ResourceId> {
    let mut ids: Vec<ResourceId> = ids.into_iter().filter(|&id| db.graph.contains(id)).collect();
    ids.sort();
    ids.dedup();
    ids
}
