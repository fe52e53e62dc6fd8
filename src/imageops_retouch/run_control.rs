//! Request supersession and progress reporting for pipeline runs.
//!
//! A caller that re-runs a pipeline whenever its inputs change hands every run
//! a [`RequestTicket`] from one shared [`RequestGeneration`]. Starting a newer
//! run supersedes all older tickets; a superseded run stops at its next stage
//! boundary and never delivers a buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::Error;

/// Pipeline stage reported to a [`ProgressObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Upscaling,
    SamplingEdges,
    Classifying,
    RefiningMask,
    Compositing,
    SmoothingEdges,
    Denoising,
    Sharpening,
    CorrectingColor,
    AdjustingTone,
    Finished,
}

/// A stage boundary notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Stage about to run, or [`Stage::Finished`]
    pub stage: Stage,
    /// Resolution multiplier of the pass emitting the event
    pub scale_factor: u32,
}

/// Receives progress notifications from a running pipeline.
///
/// Notifications may arrive from several threads when the standard and HD
/// passes run concurrently.
pub trait ProgressObserver: Sync {
    fn on_progress(&self, event: ProgressEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(ProgressEvent) + Sync,
{
    fn on_progress(&self, event: ProgressEvent) {
        self(event);
    }
}

/// Shared request counter. Cloning shares the counter.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    latest: Arc<AtomicU64>,
}

impl RequestGeneration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding every ticket handed out before.
    pub fn begin(&self) -> RequestTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        RequestTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Generation of the most recently started run.
    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

/// Identity of one pipeline run.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RequestTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// # Errors
    ///
    /// * `Error::Superseded` - When a newer run has started
    pub fn ensure_current(&self) -> Result<(), Error> {
        let latest = self.latest.load(Ordering::Acquire);
        if latest == self.generation {
            Ok(())
        } else {
            Err(Error::Superseded {
                generation: self.generation,
                latest,
            })
        }
    }
}

/// Optional supervision attached to a pipeline run.
#[derive(Clone, Copy, Default)]
pub struct RunContext<'a> {
    ticket: Option<&'a RequestTicket>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> RunContext<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ticket(mut self, ticket: &'a RequestTicket) -> Self {
        self.ticket = Some(ticket);
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Stage boundary: abandon the run if superseded, otherwise report progress.
    pub(crate) fn checkpoint(&self, stage: Stage, scale_factor: u32) -> Result<(), Error> {
        if let Some(ticket) = self.ticket {
            ticket.ensure_current()?;
        }
        if let Some(observer) = self.observer {
            observer.on_progress(ProgressEvent {
                stage,
                scale_factor,
            });
        }
        Ok(())
    }

    /// Final check before a result leaves the pipeline.
    pub(crate) fn deliver<T>(&self, value: T, scale_factor: u32) -> Result<T, Error> {
        self.checkpoint(Stage::Finished, scale_factor)?;
        Ok(value)
    }
}

impl std::fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("ticket", &self.ticket)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
