//! Background builds on tokio's blocking pool.
//!
//! Every submission bumps a shared generation counter. A running build holds
//! a [`CancelToken`] for the generation it was issued under and bails out
//! between pipeline stages once a newer build has been submitted.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use image::RgbaImage;
use tracing::{debug, info};
use crate::{
    error::{CutlineError, Result},
    pipeline::{BoardOutput, BoardPipeline},
};

#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl CancelToken {
    /// A token nothing can supersede
    pub fn never() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            issued: 0,
        }
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn is_cancelled(&self) -> bool {
        self.generation.load(Ordering::Acquire) != self.issued
    }

    /// `Err(Cancelled)` once a newer generation exists
    pub fn check(&self) -> Result<()> {
        let current = self.generation.load(Ordering::Acquire);
        if current != self.issued {
            debug!(issued = self.issued, current, "build superseded");
            return Err(CutlineError::Cancelled { current });
        }
        Ok(())
    }
}

/// Runs one pipeline at a time in the background; newer submissions win.
#[derive(Clone)]
pub struct BuildWorker {
    pipeline: Arc<BoardPipeline>,
    generation: Arc<AtomicU64>,
}

impl BuildWorker {
    pub fn new(pipeline: BoardPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Swap the pipeline used by later submissions; running builds keep theirs
    pub fn set_pipeline(&mut self, pipeline: BoardPipeline) {
        self.pipeline = Arc::new(pipeline);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Invalidate whatever is running without starting anything new
    pub fn cancel(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Start a token for a new generation, superseding older ones
    pub fn next_token(&self) -> CancelToken {
        CancelToken {
            generation: Arc::clone(&self.generation),
            issued: self.cancel(),
        }
    }

    /// Build on the blocking pool. Resolves to `Cancelled` if another build
    /// was submitted before this one finished its last stage.
    pub async fn submit(&self, image: Arc<RgbaImage>) -> Result<BoardOutput> {
        let token = self.next_token();
        let pipeline = Arc::clone(&self.pipeline);
        let issued = token.issued();
        info!(generation = issued, width = image.width(), height = image.height(), "submitting build");

        let output = tokio::task::spawn_blocking(move || {
            pipeline.process_with_cancel(&image, &token)
        })
        .await??;

        info!(generation = issued, holes = output.holes.len(), "build finished");
        Ok(output)
    }
}
