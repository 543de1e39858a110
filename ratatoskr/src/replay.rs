//! Replay of recorded skeleton frames.
//!
//! A recording is a sequence of JSON skeleton frames, as published by the sensor. Frames may be
//! separated by any whitespace, so both one frame per line and pretty printed frames are accepted.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use miette::{IntoDiagnostic, Result, WrapErr};
use retarget::{DecodeError, SkeletonFrame};
use serde_json::de::IoRead;
use serde_json::{StreamDeserializer, Value};

/// A frame source reading a recording.
///
/// Reading stops at the first syntax error, a frame that is valid JSON but not a valid skeleton
/// frame is yielded as an error and skipped.
pub struct ReplaySource<R: Read> {
    frames: StreamDeserializer<'static, IoRead<R>, Value>,
    interval: Option<Duration>,
    last_frame: Option<Instant>,
    stopped: Arc<AtomicBool>,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to open recording {}", path.display()))?;

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            frames: serde_json::Deserializer::from_reader(reader).into_iter(),
            interval: None,
            last_frame: None,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Yield at most `rate` frames per second, instead of as fast as possible.
    ///
    /// A rate that is not a positive, finite number leaves the replay unpaced.
    #[must_use]
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.interval =
            (rate.is_finite() && rate > 0.0).then(|| Duration::from_secs_f64(1.0 / rate));
        self
    }

    /// A flag that ends the replay once set.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stopped.clone()
    }

    fn pace(&mut self) {
        let Some(interval) = self.interval else {
            return;
        };

        if let Some(elapsed) = self.last_frame.map(|last_frame| last_frame.elapsed()) {
            std::thread::sleep(interval.saturating_sub(elapsed));
        }

        self.last_frame = Some(Instant::now());
    }
}

impl<R: Read> Iterator for ReplaySource<R> {
    type Item = retarget::Result<SkeletonFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped.load(Ordering::Relaxed) {
            return None;
        }

        let frame = match self.frames.next()? {
            Ok(value) => SkeletonFrame::from_value(value).map_err(retarget::Error::from),
            Err(error) => {
                self.stopped.store(true, Ordering::Relaxed);
                Err(DecodeError::Json(error).into())
            }
        };

        self.pace();
        Some(frame)
    }
}
