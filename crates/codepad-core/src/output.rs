//! Canonical output state and surface reconciliation
//!
//! All three backends funnel their results into one `CanonicalOutput` carrying
//! a monotonic generation key. The key changes exactly once per run, before
//! any of that run's output is written, so a surface (or a late write from a
//! superseded run) can always tell which run a piece of content belongs to.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::PlaygroundError;

/// The single normalized representation of a run's output, regardless of
/// which backend produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CanonicalOutput {
    pub content: String,
    pub generation: u64,
}

/// Shared output state. Writers pass the generation their run was assigned;
/// writes belonging to an older generation are refused so stale asynchronous
/// results never reach a surface.
#[derive(Debug)]
pub struct OutputState {
    tx: watch::Sender<CanonicalOutput>,
}

impl OutputState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(CanonicalOutput::default());
        Self { tx }
    }

    /// Start a new run: bump the generation and clear the content. The bump
    /// is published before the caller gets the new key back, so subscribers
    /// observe it ahead of any of the run's output.
    pub fn begin_run(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|output| {
            output.generation += 1;
            output.content.clear();
            generation = output.generation;
        });
        generation
    }

    /// Replace the content of the given generation wholesale.
    pub fn replace(&self, generation: u64, content: impl Into<String>) -> Result<(), PlaygroundError> {
        let content = content.into();
        self.write(generation, move |current| *current = content)
    }

    /// Append a chunk to the content of the given generation.
    pub fn append(&self, generation: u64, chunk: &str) -> Result<(), PlaygroundError> {
        self.write(generation, move |current| current.push_str(chunk))
    }

    fn write<F>(&self, generation: u64, apply: F) -> Result<(), PlaygroundError>
    where
        F: FnOnce(&mut String),
    {
        let mut stale = false;
        self.tx.send_if_modified(|output| {
            if output.generation != generation {
                stale = true;
                return false;
            }
            apply(&mut output.content);
            true
        });
        if stale {
            log::debug!("Dropped write for superseded generation {}", generation);
            Err(PlaygroundError::Superseded)
        } else {
            Ok(())
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CanonicalOutput> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> CanonicalOutput {
        self.tx.borrow().clone()
    }
}

impl Default for OutputState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a terminal surface should do with one observed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDirective {
    /// A new run began: clear the buffer and write this content.
    ClearAndWrite(String),
    /// Same run, more content: rewrite the buffer with the full content.
    /// Full rewrites avoid the duplicate-output bugs of incremental appends.
    Rewrite(String),
    /// Update belongs to a generation older than the last one rendered.
    Skip,
}

/// Per-surface reconciliation state. A surface never renders content older
/// than the generation it last cleared for.
#[derive(Debug, Default)]
pub struct TerminalReconciler {
    last_generation: u64,
}

impl TerminalReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, update: &CanonicalOutput) -> RenderDirective {
        if update.generation > self.last_generation {
            self.last_generation = update.generation;
            RenderDirective::ClearAndWrite(update.content.clone())
        } else if update.generation == self.last_generation {
            RenderDirective::Rewrite(update.content.clone())
        } else {
            RenderDirective::Skip
        }
    }
}
