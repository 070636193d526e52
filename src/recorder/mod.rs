// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Composite recording.
//!
//! `CompositeRecorder` is a two-state machine (Idle -> Recording -> Idle)
//! driven at display-refresh cadence. Each tick it merges the overlay and
//! drawing surfaces into a reused composite buffer and hands the result to
//! a [`VideoEncoder`] collaborator, collecting whatever encoded chunks
//! have become available. Stopping finalizes the encoder and concatenates
//! all chunks, in arrival order, into one media object.
//!
//! Failure policy: a failed start leaves the machine Idle with nothing
//! allocated and reports the error to the caller; a failed tick is logged
//! and swallowed so the loop never dies from one bad frame.

#[cfg(feature = "video-ffmpeg")]
pub mod ffmpeg;

use thiserror::Error;

use crate::render::composite::composite_into;
use crate::render::surface::Surface;

/// Nominal capture rate handed to the encoder. A hint, not a guarantee:
/// frames are delivered at whatever cadence the host repaints.
pub const CAPTURE_FRAME_RATE: u32 = 30;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("no supported video encoding is available")]
    Unsupported,
    #[error("recording already in progress")]
    AlreadyRecording,
    #[error("encoder failed: {0}")]
    Encoder(String),
}

/// Parameters the encoder is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    pub width: u32,
    pub height: u32,
    /// Capture-rate hint.
    pub frame_rate: u32,
}

/// Streaming video-encoding collaborator.
///
/// Encoders emit opaque binary chunks as they become available rather than
/// one buffer at the end, so a long recording never has to live in the
/// encoder's memory.
pub trait VideoEncoder: Send {
    /// Encode one composite frame; returns any chunks that became
    /// available.
    fn encode_frame(&mut self, frame: &Surface) -> Result<Vec<Vec<u8>>, RecorderError>;

    /// Finalize the stream and return any trailing chunks.
    fn finish(&mut self) -> Result<Vec<Vec<u8>>, RecorderError>;
}

/// The assembled output of a finished recording.
pub struct RecordedMedia {
    pub data: Vec<u8>,
    /// File extension for the container format.
    pub extension: &'static str,
}

struct RecordingSession {
    encoder: Box<dyn VideoEncoder>,
    chunks: Vec<Vec<u8>>,
    composite: Surface,
}

/// Idle/Recording state machine over an encoder collaborator.
pub struct CompositeRecorder {
    session: Option<RecordingSession>,
}

impl Default for CompositeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeRecorder {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Transition Idle -> Recording.
    ///
    /// The factory may fail (no supported encoding, permission denial);
    /// in that case the machine stays Idle, partial resources are dropped
    /// and the error is returned for the caller to report. The drawing
    /// surfaces are never touched.
    pub fn start<F>(&mut self, options: EncoderOptions, factory: F) -> Result<(), RecorderError>
    where
        F: FnOnce(EncoderOptions) -> Result<Box<dyn VideoEncoder>, RecorderError>,
    {
        if self.session.is_some() {
            return Err(RecorderError::AlreadyRecording);
        }
        let encoder = factory(options)?;
        self.session = Some(RecordingSession {
            encoder,
            chunks: Vec::new(),
            composite: Surface::new(options.width, options.height),
        });
        log::info!(
            "Recording started ({}x{}, {} fps hint)",
            options.width,
            options.height,
            options.frame_rate
        );
        Ok(())
    }

    /// One display-refresh tick: recompute the composite and feed the
    /// encoder. No-op while Idle. A transient failure skips this tick and
    /// is retried on the next one.
    pub fn tick(&mut self, overlay: &Surface, drawing: &Surface) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        composite_into(&mut session.composite, overlay, drawing);
        match session.encoder.encode_frame(&session.composite) {
            Ok(chunks) => session.chunks.extend(chunks),
            Err(e) => log::warn!("Recorder tick failed, retrying next tick: {}", e),
        }
    }

    /// Transition Recording -> Idle, finalizing the encoder and
    /// assembling all chunks into one media object. Returns `None` while
    /// Idle, so calling it repeatedly (e.g. during teardown) is safe.
    pub fn stop(&mut self) -> Option<Result<RecordedMedia, RecorderError>> {
        let mut session = self.session.take()?;
        match session.encoder.finish() {
            Ok(trailing) => session.chunks.extend(trailing),
            Err(e) => {
                log::error!("Recording finalization failed: {}", e);
                return Some(Err(e));
            }
        }
        let total: usize = session.chunks.iter().map(Vec::len).sum();
        let mut data = Vec::with_capacity(total);
        for chunk in session.chunks {
            data.extend_from_slice(&chunk);
        }
        log::info!("Recording stopped ({} bytes)", data.len());
        Some(Ok(RecordedMedia {
            data,
            extension: "webm",
        }))
    }
}

/// Default encoder factory: the bundled ffmpeg backend when the
/// `video-ffmpeg` feature is enabled, otherwise a reported
/// "no supported encoding" failure.
pub fn default_encoder(options: EncoderOptions) -> Result<Box<dyn VideoEncoder>, RecorderError> {
    #[cfg(feature = "video-ffmpeg")]
    {
        Ok(Box::new(ffmpeg::FfmpegEncoder::spawn(options)?))
    }
    #[cfg(not(feature = "video-ffmpeg"))]
    {
        let _ = options;
        Err(RecorderError::Unsupported)
    }
}
