//! Capture run: acquire → release source → condition → encode.

use std::path::PathBuf;

use crate::audio::{Acquirer, AcquisitionStatus, AudioSink, CancelToken, SampleProgress, condition};
use crate::config::Config;
use crate::error::{CaptureError, Result};
use crate::serial::{ByteSource, SourceGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Acquiring,
    Completed,
    Interrupted,
    Conditioning,
    Encoded,
    Failed,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub samples: usize,
    pub sample_rate: u32,
    pub output_path: PathBuf,
    pub interrupted: bool,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    state: PipelineState,
    interrupted: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
            interrupted: false,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Whether acquisition stopped on a cancel request, even if the run
    /// then failed. A cancel arriving after the buffer filled does not count.
    pub fn acquisition_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Run one capture against the guarded source.
    ///
    /// The source is closed right after acquisition on success, and by the
    /// guard's drop on every other path. An interrupted run with samples is
    /// still conditioned and written; with no samples it fails with
    /// `EmptyBuffer` and nothing is written.
    pub fn run<S, K, F>(
        &mut self,
        mut guard: SourceGuard<S>,
        sink: &mut K,
        cancel: &CancelToken,
        on_progress: F,
    ) -> Result<CaptureReport>
    where
        S: ByteSource,
        K: AudioSink + ?Sized,
        F: FnMut(&SampleProgress),
    {
        self.transition(PipelineState::Acquiring);

        let acquirer = Acquirer::new(self.config.max_samples, self.config.poll_interval());
        let acquisition = acquirer
            .run(guard.source_mut(), cancel, on_progress)
            .map_err(|e| self.fail(e))?;
        guard.release();
        log::info!(
            "Acquired {} samples in {:.2}s",
            acquisition.samples.len(),
            acquisition.elapsed.as_secs_f64()
        );

        let interrupted = acquisition.status == AcquisitionStatus::Interrupted;
        self.interrupted = interrupted;
        self.transition(if interrupted {
            PipelineState::Interrupted
        } else {
            PipelineState::Completed
        });

        if acquisition.samples.is_empty() {
            return Err(self.fail(CaptureError::EmptyBuffer));
        }

        self.transition(PipelineState::Conditioning);
        let normalized = condition(acquisition.samples.as_slice()).map_err(|e| self.fail(e))?;

        sink.write(
            &self.config.output_path,
            self.config.sample_rate,
            normalized.as_slice(),
        )
        .map_err(|e| self.fail(e))?;
        self.transition(PipelineState::Encoded);

        Ok(CaptureReport {
            samples: normalized.len(),
            sample_rate: self.config.sample_rate,
            output_path: self.config.output_path.clone(),
            interrupted,
        })
    }

    fn transition(&mut self, next: PipelineState) {
        log::info!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, err: CaptureError) -> CaptureError {
        log::error!("Capture failed in state {:?}: {}", self.state, err);
        self.transition(PipelineState::Failed);
        err
    }
}
