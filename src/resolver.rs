//! Natural size resolution
//!
//! A trusted size is used as-is. Otherwise the source is probed on a worker
//! thread and the outcome is collected with [`DimensionResolver::poll`].
//! Every `resolve` call starts a new generation; outcomes from older
//! generations are dropped when they arrive, so a slow probe for a previous
//! source can never overwrite the current one.

use crate::media::{MediaSource, NaturalSize, PlatformProbe, ProbeError, SizeProbe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// What `resolve` decided for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Caller-supplied size; no probe runs
    Trusted(NaturalSize),
    /// Probe started for this generation
    Pending { generation: u64 },
    /// Nothing to probe; the size stays unknown
    MissingLocator,
}

struct ProbeOutcome {
    generation: u64,
    locator: String,
    result: Result<NaturalSize, ProbeError>,
}

pub struct DimensionResolver {
    probe: Arc<dyn SizeProbe>,
    generation: u64,
    tx: Sender<ProbeOutcome>,
    rx: Receiver<ProbeOutcome>,
}

impl Default for DimensionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DimensionResolver {
    /// Resolver backed by [`PlatformProbe`]
    pub fn new() -> Self {
        Self::with_probe(Arc::new(PlatformProbe))
    }

    pub fn with_probe(probe: Arc<dyn SizeProbe>) -> Self {
        let (tx, rx) = mpsc::channel();
        DimensionResolver {
            probe,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Current generation; bumped by every `resolve`
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start resolving the size of `source`
    pub fn resolve(&mut self, source: &MediaSource, trusted: Option<NaturalSize>) -> Resolution {
        self.generation += 1;

        if let Some(size) = trusted {
            crate::trace_debug!(%source, ?size, "using trusted size");
            return Resolution::Trusted(size);
        }

        let Some(locator) = source.locator() else {
            tracing::warn!(
                %source,
                "no locator to probe; pass the pixel size explicitly for bundled media"
            );
            return Resolution::MissingLocator;
        };

        let generation = self.generation;
        let locator = locator.to_string();
        let probe = Arc::clone(&self.probe);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("mkview-probe".into())
            .spawn(move || {
                let result = probe.probe(&locator);
                // Resolver gone: nobody cares any more
                let _ = tx.send(ProbeOutcome {
                    generation,
                    locator,
                    result,
                });
            });
        if let Err(e) = spawned {
            tracing::error!(%source, error = %e, "failed to start dimension probe");
        }

        crate::trace_debug!(%source, generation, "probing size");
        Resolution::Pending { generation }
    }

    /// Drain finished probes. Returns the newest usable size for the
    /// current generation, if one arrived.
    pub fn poll(&mut self) -> Option<NaturalSize> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(size) = self.accept(outcome) {
                latest = Some(size);
            }
        }
        latest
    }

    /// Block until the current generation's probe finishes or `timeout` passes
    pub fn wait(&mut self, timeout: Duration) -> Option<NaturalSize> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) if outcome.generation == self.generation => {
                    return self.accept(outcome);
                }
                Ok(outcome) => {
                    self.accept(outcome);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }

    /// Filter one outcome, logging failures
    fn accept(&self, outcome: ProbeOutcome) -> Option<NaturalSize> {
        let ProbeOutcome {
            generation,
            locator,
            result,
        } = outcome;

        if generation != self.generation {
            crate::trace_debug!(%locator, generation, current = self.generation, "dropping stale probe");
            return None;
        }

        match result {
            Ok(size) if size.is_valid() => Some(size),
            Ok(size) => {
                crate::trace_debug!(%locator, ?size, "ignoring empty probe result");
                None
            }
            Err(ProbeError::Unsupported(reason)) => {
                tracing::warn!(source = %locator, %reason, "cannot probe size on this platform");
                None
            }
            Err(e) => {
                tracing::error!(source = %locator, error = %e, "dimension probe failed");
                None
            }
        }
    }
}
