use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::vec;

use chrono::Local;
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::gender::{self, GenderMemo};
use crate::interrupt::Interrupt;
use crate::process::process_file;
use crate::record::{Outcome, Review};
use crate::{info_time, Error, Result};

/// There shouldn't be more than a few outcomes in flight per worker.
const OUTCOME_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub id: u64,
    pub path: PathBuf,
}

/// Id of a document named `<id>.html`. The id is written in canonical form: ASCII digits
/// only, no sign and no leading zero, so every id has exactly one file name.
pub fn document_id(path: &Path) -> Result<u64> {
    let invalid = || Error::InvalidDocumentName(path.to_path_buf());
    if path.extension().and_then(|e| e.to_str()) != Some("html") {
        return Err(invalid());
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;
    let canonical = !stem.is_empty()
        && stem.bytes().all(|b| b.is_ascii_digit())
        && (stem == "0" || !stem.starts_with('0'));
    if !canonical {
        return Err(invalid());
    }
    stem.parse().map_err(|_| invalid())
}

/// Lists the documents of `dir` by ascending id. Hidden files are ignored, files not named
/// `<id>.html` are skipped with a warning.
pub fn enumerate_documents(dir: &Path, limit: Option<usize>) -> Result<Vec<DocumentEntry>> {
    let mut docs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if !path.is_file() || hidden {
            continue;
        }
        match document_id(&path) {
            Ok(id) => docs.push(DocumentEntry { id, path }),
            Err(e) => warn!("Skipping: {e}"),
        }
    }

    docs.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
    docs.dedup_by(|dup, kept| {
        let same = dup.id == kept.id;
        if same {
            warn!(
                "Skipping '{}': id {} already taken by '{}'",
                dup.path.display(),
                dup.id,
                kept.path.display()
            );
        }
        same
    });
    if let Some(limit) = limit {
        docs.truncate(limit);
    }
    info!("Data dir contains {} documents", docs.len());
    Ok(docs)
}

/// Outcome counts of a run plus the published records.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusReport {
    /// Successfully parsed reviews, by publication date ascending (ties by id).
    pub records: Vec<Review>,
    pub total: usize,
    pub not_found: usize,
    pub parse_failed: usize,
    /// `(id, reason)` of every failed document, by id.
    pub failures: Vec<(u64, String)>,
}

impl CorpusReport {
    /// Resolves neutral salutations against all documents of the run, then partitions.
    pub fn from_outcomes(mut outcomes: Vec<Outcome>, total: usize) -> Self {
        outcomes.sort_unstable_by_key(Outcome::id);
        let memo = GenderMemo::from_outcomes(&outcomes);
        let resolved = gender::resolve_neutral(&mut outcomes, &memo);
        debug!(names = memo.len(), resolved, "Global gender pass");

        let mut report = CorpusReport {
            records: Vec::new(),
            total,
            not_found: 0,
            parse_failed: 0,
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Success(review) => report.records.push(review),
                Outcome::NotFound { .. } => report.not_found += 1,
                Outcome::ParseFailed { review, reason } => {
                    report.parse_failed += 1;
                    report.failures.push((review.id, reason));
                }
            }
        }
        report.records.sort_by_key(|r| (r.date, r.id));
        report
    }

    pub fn parsable(&self) -> usize {
        self.total.saturating_sub(self.not_found + self.parse_failed)
    }

    pub fn not_found_ratio(&self) -> f64 {
        ratio(self.not_found, self.total)
    }

    /// Share of failures among the documents that were not "not found".
    pub fn unparsed_ratio(&self) -> f64 {
        ratio(self.parse_failed, self.total.saturating_sub(self.not_found))
    }

    pub fn log_summary(&self) {
        warn!(
            "Not found: {}/{} ({:.2}%)",
            self.not_found,
            self.total,
            self.not_found_ratio() * 100.0
        );
        warn!(
            "Not parsable: {}/{} ({:.2}%)",
            self.parse_failed,
            self.total.saturating_sub(self.not_found),
            self.unparsed_ratio() * 100.0
        );
        warn!("Parsable: {}", self.parsable());
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Processes `docs` on `workers` blocking workers until done or `interrupt` fires.
pub async fn process_corpus(
    docs: Vec<DocumentEntry>,
    config: Arc<ExtractConfig>,
    workers: usize,
    interrupt: &Interrupt,
) -> Result<CorpusReport> {
    interrupt.check()?;
    process_corpus_until(docs, config, workers, interrupt.clone().triggered()).await
}

/// Like [`process_corpus`], aborting with [`Error::Interrupted`] as soon as `cancel` completes.
///
/// Every worker owns its own [`GenderMemo`] and pulls documents from a shared queue, so
/// completion order is arbitrary. Outcomes are funneled through a `mpsc` channel and ordered
/// only once all of them are in.
pub async fn process_corpus_until(
    docs: Vec<DocumentEntry>,
    config: Arc<ExtractConfig>,
    workers: usize,
    cancel: impl Future<Output = ()>,
) -> Result<CorpusReport> {
    let start_time = Local::now();
    let total = docs.len();
    let workers = workers.clamp(1, total.max(1));
    info_time!("Processing {total} documents on {workers} workers");

    let queue = Arc::new(Mutex::new(docs.into_iter()));
    let stop = Arc::new(AtomicBool::new(false));
    let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);

    let mut pool = JoinSet::new();
    for worker in 0..workers {
        pool.spawn_blocking({
            let queue = queue.clone();
            let stop = stop.clone();
            let config = config.clone();
            let outcome_tx = outcome_tx.clone();
            move || run_worker(worker, &queue, &stop, &config, outcome_tx)
        });
    }
    // Only the workers hold senders now, the channel closes when the last one is done.
    drop(outcome_tx);

    let outcomes = tokio::select! {
        biased;
        _ = cancel => None,
        outcomes = collect_outcomes(outcome_rx, total) => Some(outcomes),
    };
    let Some(outcomes) = outcomes else {
        stop.store(true, Ordering::Relaxed);
        warn!("Interrupted, discarding all results");
        return Err(Error::Interrupted);
    };

    while let Some(worker) = pool.join_next().await {
        worker??;
    }
    info_time!(start_time, "All {total} documents processed.");

    let report = CorpusReport::from_outcomes(outcomes, total);
    report.log_summary();
    Ok(report)
}

/// Pulls documents until the queue is empty or the run is stopped.
fn run_worker(
    worker: usize,
    queue: &Mutex<vec::IntoIter<DocumentEntry>>,
    stop: &AtomicBool,
    config: &ExtractConfig,
    outcome_tx: mpsc::Sender<Outcome>,
) -> Result<()> {
    let mut memo = GenderMemo::new();
    let mut processed = 0;

    while !stop.load(Ordering::Relaxed) {
        let next = match queue.lock() {
            Ok(mut docs) => docs.next(),
            Err(_) => {
                warn!(worker, "Document queue poisoned, stopping worker");
                break;
            }
        };
        let Some(doc) = next else { break };

        let outcome = process_file(doc.id, &doc.path, config, &mut memo);
        outcome_tx.blocking_send(outcome)?;
        processed += 1;
    }

    debug!(worker, processed, known_reviewers = memo.len(), "Worker finished");
    Ok(())
}

/// Collects outcomes in completion order until every worker has hung up.
async fn collect_outcomes(mut outcome_rx: mpsc::Receiver<Outcome>, expected: usize) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(expected);
    while let Some(outcome) = outcome_rx.recv().await {
        debug!(id = outcome.id(), "Received outcome {}/{expected}", outcomes.len() + 1);
        outcomes.push(outcome);
    }
    outcomes
}
