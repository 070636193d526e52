// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! WebM encoding through a bundled ffmpeg child process.
//!
//! Raw RGBA composites are piped to ffmpeg's stdin; the muxed WebM stream
//! comes back on stdout as opaque chunks, forwarded over a channel by a
//! reader thread so encoding never blocks the recorder tick. Requires an
//! ffmpeg binary reachable by ffmpeg-sidecar.

use std::io::Write;
use std::process::ChildStdin;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};

use crate::recorder::{EncoderOptions, RecorderError, VideoEncoder};
use crate::render::surface::Surface;

pub struct FfmpegEncoder {
    stdin: Option<ChildStdin>,
    child: FfmpegChild,
    chunk_rx: Receiver<Vec<u8>>,
    reader: Option<JoinHandle<()>>,
    frame_len: usize,
}

impl FfmpegEncoder {
    /// Launch the ffmpeg child and the stdout reader thread.
    pub fn spawn(options: EncoderOptions) -> Result<Self, RecorderError> {
        let size = format!("{}x{}", options.width, options.height);
        let rate = options.frame_rate.to_string();

        let mut child = FfmpegCommand::new()
            .hide_banner()
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "-s", &size, "-r", &rate])
            .input("pipe:0")
            .args(["-c:v", "libvpx", "-pix_fmt", "yuv420p", "-deadline", "realtime"])
            .format("webm")
            .output("pipe:1")
            .spawn()
            .map_err(|e| RecorderError::Encoder(format!("failed to launch ffmpeg: {}", e)))?;

        let stdin = child
            .take_stdin()
            .ok_or_else(|| RecorderError::Encoder("ffmpeg stdin unavailable".into()))?;
        let events = child
            .iter()
            .map_err(|e| RecorderError::Encoder(e.to_string()))?;

        let (tx, chunk_rx) = mpsc::channel();
        let reader = thread::spawn(move || {
            for event in events {
                match event {
                    FfmpegEvent::OutputChunk(chunk) => {
                        if tx.send(chunk).is_err() {
                            break;
                        }
                    }
                    FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                        log::warn!("ffmpeg: {}", msg);
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            stdin: Some(stdin),
            child,
            chunk_rx,
            reader: Some(reader),
            frame_len: options.width as usize * options.height as usize * 4,
        })
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn encode_frame(&mut self, frame: &Surface) -> Result<Vec<Vec<u8>>, RecorderError> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| RecorderError::Encoder("encoder already finalized".into()))?;

        let raw = frame.as_raw();
        if raw.len() != self.frame_len {
            return Err(RecorderError::Encoder(format!(
                "frame is {} bytes, encoder expects {}",
                raw.len(),
                self.frame_len
            )));
        }
        stdin
            .write_all(raw)
            .map_err(|e| RecorderError::Encoder(e.to_string()))?;

        Ok(self.chunk_rx.try_iter().collect())
    }

    fn finish(&mut self) -> Result<Vec<Vec<u8>>, RecorderError> {
        // Closing stdin tells ffmpeg to flush and exit.
        drop(self.stdin.take());
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        let _ = self.child.wait();
        Ok(self.chunk_rx.try_iter().collect())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            let _ = self.finish();
        }
    }
}
