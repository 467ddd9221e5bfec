//! Bulk border processing.
//!
//! Drives every `Pending` entry of an [`ImageQueue`] through load → render,
//! one entry at a time, in insertion order:
//!
//! ```text
//! for each pending entry:
//!     Pending → Processing          ProcessEvent::ItemStarted
//!     loader.load + compositor      (any failure is captured, not returned)
//!     → Processed | Failed          ProcessEvent::ItemFinished
//! ProcessEvent::BatchFinished
//! ```
//!
//! ## Failure handling
//!
//! Load, decode and encode errors mark only their own entry `Failed`; the
//! batch always runs to the end and the caller gets a [`BatchReport`] with the
//! full picture. Failed entries are not retried and are never saved.
//!
//! ## Determinism
//!
//! Processing is sequential, so progress events arrive in queue order. The
//! [`BorderSpec`] is passed by value at batch start; every entry in a batch is
//! rendered with the same border even if the caller's settings change.
//!
//! ## Progress
//!
//! Events go through an optional `mpsc::Sender`, keeping this module free of
//! printing. The CLI drains the channel on a printer thread.

use crate::imaging::{BorderSpec, FailureKind, ImageLoader, compositor};
use crate::queue::ImageQueue;
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::time::Duration;

/// Progress events emitted during a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    ItemStarted {
        /// 1-based position among the entries processed in this batch.
        index: usize,
        total: usize,
        name: String,
    },
    ItemFinished {
        index: usize,
        total: usize,
        name: String,
        outcome: ItemOutcome,
    },
    BatchFinished(BatchReport),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Processed { width: u32, height: u32 },
    Failed { kind: FailureKind, message: String },
}

/// Summary of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Knobs that do not affect output pixels.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Pause after each entry. Purely cosmetic (keeps progress readable).
    pub item_delay: Duration,
}

fn send(progress: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching.
        tx.send(event).ok();
    }
}

/// Process every pending entry in `queue`.
///
/// Entries already `Processed` or `Failed` from an earlier run are left alone
/// and not counted in the report.
pub fn run(
    queue: &mut ImageQueue,
    spec: BorderSpec,
    loader: &impl ImageLoader,
    options: &BatchOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> BatchReport {
    let pending: Vec<usize> = queue
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.state().is_terminal())
        .map(|(i, _)| i)
        .collect();
    let total = pending.len();
    let mut report = BatchReport {
        total,
        ..Default::default()
    };

    for (n, &slot) in pending.iter().enumerate() {
        let index = n + 1;
        let entry = &mut queue.entries_mut()[slot];
        if !entry.start() {
            continue;
        }
        let name = entry.display_name.clone();
        send(
            &progress,
            ProcessEvent::ItemStarted {
                index,
                total,
                name: name.clone(),
            },
        );

        let rendered = loader
            .load(&entry.source)
            .and_then(|handle| compositor::render(&handle, &spec));

        let outcome = match &rendered {
            Ok(result) => ItemOutcome::Processed {
                width: result.width,
                height: result.height,
            },
            Err(err) => ItemOutcome::Failed {
                kind: err.kind(),
                message: err.to_string(),
            },
        };
        match &outcome {
            ItemOutcome::Processed { .. } => report.succeeded += 1,
            ItemOutcome::Failed { .. } => report.failed += 1,
        }
        entry.finish(rendered.map_err(|e| e.to_string()));

        send(
            &progress,
            ProcessEvent::ItemFinished {
                index,
                total,
                name,
                outcome,
            },
        );

        if !options.item_delay.is_zero() && index < total {
            std::thread::sleep(options.item_delay);
        }
    }

    send(&progress, ProcessEvent::BatchFinished(report));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockLoader;
    use crate::imaging::{ImageSource, Rgb};
    use crate::queue::EntryState;
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn queue_of(names: &[&str]) -> ImageQueue {
        let mut queue = ImageQueue::new();
        for name in names {
            queue.add(ImageSource::Path(PathBuf::from(format!("/photos/{name}"))));
        }
        queue
    }

    fn collect_events(
        queue: &mut ImageQueue,
        loader: &MockLoader,
        spec: BorderSpec,
    ) -> (BatchReport, Vec<ProcessEvent>) {
        let (tx, rx) = mpsc::channel();
        let report = run(queue, spec, loader, &BatchOptions::default(), Some(tx));
        (report, rx.into_iter().collect())
    }

    #[test]
    fn all_entries_succeed() {
        let mut queue = queue_of(&["a.jpg", "b.jpg", "c.jpg"]);
        let loader = MockLoader::new();
        let report = run(
            &mut queue,
            BorderSpec::default(),
            &loader,
            &BatchOptions::default(),
            None,
        );

        assert_eq!(
            report,
            BatchReport {
                total: 3,
                succeeded: 3,
                failed: 0
            }
        );
        assert!(queue.entries().iter().all(|e| e.result().is_some()));
    }

    #[test]
    fn one_failure_does_not_abort_batch() {
        for k in 0..4 {
            let names = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"];
            let mut queue = queue_of(&names);
            let loader = MockLoader::failing_on(&[names[k]]);
            let report = run(
                &mut queue,
                BorderSpec::default(),
                &loader,
                &BatchOptions::default(),
                None,
            );

            assert_eq!(report.succeeded, 3);
            assert_eq!(report.failed, 1);
            for (i, entry) in queue.entries().iter().enumerate() {
                if i == k {
                    assert!(matches!(entry.state(), EntryState::Failed(_)));
                } else {
                    assert!(matches!(entry.state(), EntryState::Processed(_)));
                }
            }
            // Every entry was attempted, in order
            assert_eq!(loader.get_loads(), names.to_vec());
        }
    }

    #[test]
    fn progress_follows_insertion_order() {
        let mut queue = queue_of(&["z.png", "a.png", "m.png"]);
        let loader = MockLoader::failing_on(&["a.png"]);
        let (_, events) = collect_events(&mut queue, &loader, BorderSpec::default());

        let started: Vec<(usize, usize, String)> = events
            .iter()
            .filter_map(|e| match e {
                ProcessEvent::ItemStarted { index, total, name } => {
                    Some((*index, *total, name.clone()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            started,
            vec![
                (1, 3, "z.png".to_string()),
                (2, 3, "a.png".to_string()),
                (3, 3, "m.png".to_string()),
            ]
        );
    }

    #[test]
    fn events_pair_start_and_finish() {
        let mut queue = queue_of(&["a.png", "b.png"]);
        let loader = MockLoader::failing_on(&["b.png"]);
        let (report, events) = collect_events(&mut queue, &loader, BorderSpec::default());

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], ProcessEvent::ItemStarted { index: 1, .. }));
        assert!(matches!(
            &events[1],
            ProcessEvent::ItemFinished {
                index: 1,
                outcome: ItemOutcome::Processed { .. },
                ..
            }
        ));
        assert!(matches!(&events[2], ProcessEvent::ItemStarted { index: 2, .. }));
        assert!(matches!(
            &events[3],
            ProcessEvent::ItemFinished {
                index: 2,
                outcome: ItemOutcome::Failed {
                    kind: FailureKind::Decode,
                    ..
                },
                ..
            }
        ));
        assert_eq!(events[4], ProcessEvent::BatchFinished(report));
    }

    #[test]
    fn batch_uses_one_border_for_every_entry() {
        let mut queue = queue_of(&["a.png", "b.png"]);
        let spec = BorderSpec::new(12.0, Rgb::new(1, 2, 3)).unwrap();
        run(
            &mut queue,
            spec,
            &MockLoader::new(),
            &BatchOptions::default(),
            None,
        );
        for (_, result) in queue.processed() {
            assert_eq!(result.border, spec);
        }
    }

    #[test]
    fn rendered_dimensions_reported() {
        let mut queue = queue_of(&["a.png"]);
        let loader = MockLoader::new().with_dimensions("a.png", (80, 100));
        let spec = BorderSpec::new(10.0, Rgb::WHITE).unwrap();
        let (_, events) = collect_events(&mut queue, &loader, spec);

        assert!(events.iter().any(|e| matches!(
            e,
            ProcessEvent::ItemFinished {
                outcome: ItemOutcome::Processed {
                    width: 96,
                    height: 120
                },
                ..
            }
        )));
    }

    #[test]
    fn second_run_skips_terminal_entries() {
        let mut queue = queue_of(&["a.png", "b.png"]);
        let loader = MockLoader::failing_on(&["b.png"]);
        run(
            &mut queue,
            BorderSpec::default(),
            &loader,
            &BatchOptions::default(),
            None,
        );

        queue.add(ImageSource::Path(PathBuf::from("/photos/c.png")));
        let report = run(
            &mut queue,
            BorderSpec::default(),
            &loader,
            &BatchOptions::default(),
            None,
        );

        assert_eq!(
            report,
            BatchReport {
                total: 1,
                succeeded: 1,
                failed: 0
            }
        );
        // b.png stays failed, not retried
        assert!(matches!(queue.entries()[1].state(), EntryState::Failed(_)));
        assert_eq!(loader.get_loads(), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn oversized_canvas_fails_only_its_entry() {
        let mut queue = ImageQueue::new();
        queue.add(ImageSource::blob("strip.png", vec![]));
        queue.add(ImageSource::blob("ok.png", vec![]));
        let loader = MockLoader::new()
            .with_dimensions("strip.png", (100_000, 1))
            .with_dimensions("ok.png", (4, 5));

        let (report, events) = collect_events(&mut queue, &loader, BorderSpec::default());

        assert_eq!(
            report,
            BatchReport {
                total: 2,
                succeeded: 1,
                failed: 1
            }
        );
        assert!(matches!(queue.entries()[0].state(), EntryState::Failed(_)));
        assert!(matches!(queue.entries()[1].state(), EntryState::Processed(_)));
        assert!(events.iter().any(|e| matches!(
            e,
            ProcessEvent::ItemFinished {
                index: 1,
                outcome: ItemOutcome::Failed {
                    kind: FailureKind::Encode,
                    ..
                },
                ..
            }
        )));
    }

    #[test]
    fn empty_queue_reports_zero() {
        let mut queue = ImageQueue::new();
        let (report, events) = collect_events(&mut queue, &MockLoader::new(), BorderSpec::default());
        assert_eq!(report, BatchReport::default());
        assert_eq!(events, vec![ProcessEvent::BatchFinished(report)]);
    }

    #[test]
    fn dropped_receiver_does_not_stop_batch() {
        let mut queue = queue_of(&["a.png", "b.png"]);
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let report = run(
            &mut queue,
            BorderSpec::default(),
            &MockLoader::new(),
            &BatchOptions::default(),
            Some(tx),
        );
        assert_eq!(report.succeeded, 2);
    }
}
