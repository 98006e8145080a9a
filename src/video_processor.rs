// src/video_processor.rs

use crate::error::{DetectorError, Result};
use crate::pipeline::{CountEventLog, PerformanceSummary, PipelineMetrics};
use crate::types::{Config, CountEvent, FailurePolicy};
use crate::wagon_detector::WagonDetector;
use opencv::{
    core::{self, Mat},
    highgui,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

const WINDOW_NAME: &str = "Wagon Detection";
const PROCESSED_PREFIX: &str = "processed_";
/// Under `FailurePolicy::Skip`, give up after this many failures in a row.
const MAX_CONSECUTIVE_FAILURES: u32 = 30;
/// Used when the container does not report a usable frame rate.
const DEFAULT_FPS: f64 = 25.0;

pub struct VideoProcessor {
    config: Config,
}

impl VideoProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Videos under `dir`, sorted, excluding our own `processed_*` outputs.
    pub fn find_video_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let video_extensions = ["mp4", "avi", "mov", "mkv"];

        let mut videos: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|path| {
                let is_video = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| video_extensions.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false);
                let is_output = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(PROCESSED_PREFIX))
                    .unwrap_or(false);
                is_video && !is_output
            })
            .collect();
        videos.sort();

        info!("Found {} video files in {}", videos.len(), dir.display());
        Ok(videos)
    }

    /// `<output_dir>/processed_<file name>`
    pub fn processed_output_path(&self, input_path: &Path) -> PathBuf {
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video.mp4".to_string());
        PathBuf::from(&self.config.video.output_dir).join(format!("{}{}", PROCESSED_PREFIX, name))
    }

    pub fn open_video(&self, path: &Path) -> Result<VideoReader> {
        info!("Opening video: {}", path.display());

        let open_err = || DetectorError::VideoOpen {
            path: path.to_path_buf(),
        };
        let path_str = path.to_str().ok_or_else(open_err)?;
        let cap = VideoCapture::from_file(path_str, videoio::CAP_ANY).map_err(|_| open_err())?;
        if !cap.is_opened()? {
            return Err(open_err());
        }

        let fps = usable_fps(cap.get(videoio::CAP_PROP_FPS)?);
        let total_frames = cap.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;
        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

        info!(
            "Video properties: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );

        Ok(VideoReader {
            cap,
            fps,
            total_frames,
            frames_read: 0,
            width,
            height,
        })
    }

    /// Writer matching the input's size and frame rate.
    pub fn create_writer(
        &self,
        output_path: &Path,
        width: i32,
        height: i32,
        fps: f64,
    ) -> Result<VideoWriter> {
        let open_err = || DetectorError::OutputOpen {
            path: output_path.to_path_buf(),
        };

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut code = self.config.video.fourcc.chars();
        let (Some(c1), Some(c2), Some(c3), Some(c4)) =
            (code.next(), code.next(), code.next(), code.next())
        else {
            return Err(DetectorError::Configuration(format!(
                "fourcc must be four characters, got {:?}",
                self.config.video.fourcc
            )));
        };
        let fourcc = VideoWriter::fourcc(c1, c2, c3, c4)?;

        let path_str = output_path.to_str().ok_or_else(open_err)?;
        let writer = VideoWriter::new(path_str, fourcc, fps, core::Size::new(width, height), true)
            .map_err(|_| open_err())?;
        if !writer.is_opened()? {
            return Err(open_err());
        }

        info!("Output video: {}", output_path.display());
        Ok(writer)
    }
}

fn usable_fps(reported: f64) -> f64 {
    if reported.is_finite() && reported > 0.0 {
        return reported;
    }
    warn!(
        "Video reports {} FPS, falling back to {:.1}",
        reported, DEFAULT_FPS
    );
    DEFAULT_FPS
}

pub struct VideoReader {
    pub cap: VideoCapture,
    pub fps: f64,
    pub total_frames: i64,
    pub frames_read: u64,
    pub width: i32,
    pub height: i32,
}

impl VideoReader {
    /// `Ok(None)` at end of stream.
    pub fn read_frame(&mut self) -> Result<Option<Mat>> {
        let mut mat = Mat::default();
        if !self.cap.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }
        self.frames_read += 1;
        Ok(Some(mat))
    }

    pub fn progress(&self) -> f32 {
        if self.total_frames <= 0 {
            return 0.0;
        }
        (self.frames_read as f32 / self.total_frames as f32) * 100.0
    }
}

/// Destination for annotated frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()>;

    /// Called once when the run ends, however it ends.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl FrameSink for VideoWriter {
    fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        self.write(frame)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.release()?;
        Ok(())
    }
}

/// Owns the I/O handles of one run and releases them on every exit path.
struct VideoSession {
    reader: VideoReader,
    sink: Option<Box<dyn FrameSink>>,
    display: bool,
}

impl VideoSession {
    /// Returns true when the user asked to stop.
    fn show(&self, frame: &Mat) -> Result<bool> {
        if !self.display {
            return Ok(false);
        }
        highgui::imshow(WINDOW_NAME, frame)?;
        let key = highgui::wait_key(1)? & 0xFF;
        Ok(key == 'q' as i32 || key == 27)
    }
}

impl Drop for VideoSession {
    fn drop(&mut self) {
        if let Err(e) = self.reader.cap.release() {
            warn!("Failed to release input video: {}", e);
        }
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.finish() {
                warn!("Failed to release output video: {}", e);
            }
        }
        if self.display {
            if let Err(e) = highgui::destroy_all_windows() {
                warn!("Failed to close display windows: {}", e);
            }
        }
        debug!("Video handles released");
    }
}

/// Optional outputs of a run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub output: Option<PathBuf>,
    pub display: bool,
    pub events: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub wagon_count: u64,
    pub frames_processed: u64,
    pub skipped_frames: u64,
    /// Frame index of the failure that ended the run early
    pub aborted_at: Option<u64>,
    pub stopped_by_user: bool,
    pub performance: PerformanceSummary,
    pub events: Vec<CountEvent>,
}

/// Counts wagons in `input`, optionally writing an annotated copy to
/// `output` and showing frames live.
pub fn process_video(
    input: &Path,
    output: Option<&Path>,
    display: bool,
    config: &Config,
) -> Result<RunReport> {
    let options = ProcessOptions {
        output: output.map(Path::to_path_buf),
        display,
        events: None,
    };
    process_video_with_options(input, &options, config)
}

/// Just the final count.
pub fn count_wagons(input: &Path, config: &Config) -> Result<u64> {
    Ok(process_video(input, None, false, config)?.wagon_count)
}

pub fn process_video_with_options(
    input: &Path,
    options: &ProcessOptions,
    config: &Config,
) -> Result<RunReport> {
    let processor = VideoProcessor::new(config.clone());
    let detector = WagonDetector::new(config.clone())?.with_source(&input.display().to_string());

    let reader = processor.open_video(input)?;
    let mut session = VideoSession {
        sink: None,
        display: options.display,
        reader,
    };
    if let Some(path) = &options.output {
        let writer = processor.create_writer(
            path,
            session.reader.width,
            session.reader.height,
            session.reader.fps,
        )?;
        session.sink = Some(Box::new(writer));
    }
    let event_log = match &options.events {
        Some(path) => Some(CountEventLog::create(path)?),
        None => None,
    };

    Ok(drive(input, session, detector, event_log, config.failure_policy))
}

/// Frame loop. Per-frame errors are handled according to `policy`, so the
/// report always carries the count reached before the run ended.
fn drive(
    source: &Path,
    mut session: VideoSession,
    mut detector: WagonDetector,
    mut event_log: Option<CountEventLog>,
    policy: FailurePolicy,
) -> RunReport {
    let mut metrics = PipelineMetrics::new();
    let mut events: Vec<CountEvent> = Vec::new();
    let mut frame_index: u64 = 0;
    let mut frames_processed: u64 = 0;
    let mut skipped_frames: u64 = 0;
    let mut consecutive_failures: u32 = 0;
    let mut aborted_at: Option<u64> = None;
    let mut stopped_by_user = false;

    loop {
        let step = run_frame(
            &mut session,
            &mut detector,
            &mut metrics,
            event_log.as_mut(),
            &mut events,
            frame_index,
        );

        match step {
            Ok(FrameStep::EndOfStream) => break,
            Ok(FrameStep::Processed { stop }) => {
                frames_processed += 1;
                consecutive_failures = 0;
                if stop {
                    info!("Stopped by user at frame {}", frame_index);
                    stopped_by_user = true;
                    break;
                }
            }
            Err(e) => {
                let e = e.at_frame(frame_index);
                error!("Error processing video: {}", e);
                consecutive_failures += 1;
                match policy {
                    FailurePolicy::Abort => {
                        aborted_at = Some(frame_index);
                        break;
                    }
                    FailurePolicy::Skip if consecutive_failures >= MAX_CONSECUTIVE_FAILURES => {
                        warn!(
                            "{} consecutive frame failures, giving up",
                            consecutive_failures
                        );
                        aborted_at = Some(frame_index);
                        break;
                    }
                    FailurePolicy::Skip => skipped_frames += 1,
                }
            }
        }

        frame_index += 1;
        if frame_index % 300 == 0 {
            debug!(
                "Frame {} ({:.1}%), count so far {}",
                frame_index,
                session.reader.progress(),
                detector.wagon_count()
            );
        }
    }

    if let Some(log) = event_log.as_mut() {
        if let Err(e) = log.flush() {
            warn!("Failed to flush count events: {}", e);
        }
    }
    drop(session);

    let performance = metrics.summary();
    info!("Performance Metrics:");
    info!(
        "  Average processing time per frame: {:.3} seconds",
        performance.avg_processing_secs
    );
    info!("  Average FPS: {:.2}", performance.avg_fps);

    RunReport {
        source: source.to_path_buf(),
        wagon_count: detector.wagon_count(),
        frames_processed,
        skipped_frames,
        aborted_at,
        stopped_by_user,
        performance,
        events,
    }
}

enum FrameStep {
    EndOfStream,
    Processed { stop: bool },
}

/// Count events reach `events` and the event log before the annotated frame
/// is written, so an output failure cannot lose a count.
fn run_frame(
    session: &mut VideoSession,
    detector: &mut WagonDetector,
    metrics: &mut PipelineMetrics,
    event_log: Option<&mut CountEventLog>,
    events: &mut Vec<CountEvent>,
    frame_index: u64,
) -> Result<FrameStep> {
    let Some(frame) = session.reader.read_frame()? else {
        return Ok(FrameStep::EndOfStream);
    };

    let started = Instant::now();
    let output = detector.process_frame(&frame, frame_index)?;
    metrics.record(started.elapsed());

    events.extend(output.events.iter().cloned());
    if let Some(log) = event_log {
        for event in &output.events {
            log.append(event)?;
        }
    }

    if let Some(sink) = session.sink.as_mut() {
        sink.write_frame(&output.annotated)?;
    }
    let stop = session.show(&output.annotated)?;

    Ok(FrameStep::Processed { stop })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{build_segmenter, MotionSegmenter};
    use crate::types::PreprocessConfig;
    use opencv::core::{Rect, Scalar};
    use opencv::imgproc;
    use std::cell::Cell;
    use std::rc::Rc;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wagon_detection_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.preprocess = PreprocessConfig {
            resize_width: 320,
            resize_height: 240,
            blur_kernel_size: 5,
        };
        config.counting.min_area = 300.0;
        config.counting.line_position = 0.5;
        config.roi.offset = [0, 0];
        config.video.fourcc = "MJPG".to_string();
        config
    }

    /// MJPG AVI with `still` static frames followed by one wagon crossing.
    fn write_synthetic_video(path: &Path, still: usize, fps: f64) -> usize {
        let fourcc = VideoWriter::fourcc('M', 'J', 'P', 'G').unwrap();
        let mut writer = VideoWriter::new(
            path.to_str().unwrap(),
            fourcc,
            fps,
            core::Size::new(320, 240),
            true,
        )
        .unwrap();
        assert!(writer.is_opened().unwrap());

        let mut written = 0;
        let positions = (0..still)
            .map(|_| None)
            .chain((0..26).map(|k| Some(40 + 8 * k)));
        for top in positions {
            let mut frame =
                Mat::new_rows_cols_with_default(240, 320, core::CV_8UC3, Scalar::all(50.0))
                    .unwrap();
            if let Some(top) = top {
                imgproc::rectangle(
                    &mut frame,
                    Rect::new(140, top, 40, 40),
                    Scalar::all(255.0),
                    -1,
                    imgproc::LINE_8,
                    0,
                )
                .unwrap();
            }
            writer.write(&frame).unwrap();
            written += 1;
        }
        writer.release().unwrap();
        written
    }

    fn count_frames(path: &Path) -> (usize, f64) {
        let mut cap = VideoCapture::from_file(path.to_str().unwrap(), videoio::CAP_ANY).unwrap();
        assert!(cap.is_opened().unwrap());
        let fps = cap.get(videoio::CAP_PROP_FPS).unwrap();
        let mut frames = 0;
        let mut mat = Mat::default();
        while cap.read(&mut mat).unwrap() && !mat.empty() {
            frames += 1;
        }
        (frames, fps)
    }

    fn injected_failure(what: &str) -> DetectorError {
        DetectorError::Io(std::io::Error::new(std::io::ErrorKind::Other, what.to_string()))
    }

    /// Delegates to a real segmenter but fails on selected calls.
    struct FlakySegmenter {
        inner: Box<dyn MotionSegmenter>,
        calls: u64,
        fails: fn(u64) -> bool,
    }

    impl MotionSegmenter for FlakySegmenter {
        fn observe_and_classify(&mut self, frame: &Mat) -> Result<Mat> {
            let call = self.calls;
            self.calls += 1;
            if (self.fails)(call) {
                return Err(injected_failure("segmenter"));
            }
            self.inner.observe_and_classify(frame)
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    /// Counts written frames, optionally failing one write attempt.
    struct RecordingSink {
        fail_at: Option<usize>,
        attempts: usize,
        written: Rc<Cell<usize>>,
        finished: Rc<Cell<bool>>,
    }

    impl FrameSink for RecordingSink {
        fn write_frame(&mut self, _frame: &Mat) -> Result<()> {
            let attempt = self.attempts;
            self.attempts += 1;
            if self.fail_at == Some(attempt) {
                return Err(injected_failure("sink"));
            }
            self.written.set(self.written.get() + 1);
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            self.finished.set(true);
            Ok(())
        }
    }

    struct SinkTally {
        written: Rc<Cell<usize>>,
        finished: Rc<Cell<bool>>,
    }

    fn recording_sink(fail_at: Option<usize>) -> (Box<dyn FrameSink>, SinkTally) {
        let written = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(false));
        let sink = RecordingSink {
            fail_at,
            attempts: 0,
            written: Rc::clone(&written),
            finished: Rc::clone(&finished),
        };
        (Box::new(sink), SinkTally { written, finished })
    }

    fn session_for(input: &Path, sink: Option<Box<dyn FrameSink>>) -> VideoSession {
        let reader = VideoProcessor::new(test_config()).open_video(input).unwrap();
        VideoSession {
            reader,
            sink,
            display: false,
        }
    }

    /// Segmenter call `i` is frame `i`, since every frame is segmented once.
    fn detector_failing_on(fails: fn(u64) -> bool) -> WagonDetector {
        let config = test_config();
        let inner = build_segmenter(config.segmenter, &config.background).unwrap();
        let segmenter = FlakySegmenter {
            inner,
            calls: 0,
            fails,
        };
        WagonDetector::with_segmenter(config, Box::new(segmenter)).unwrap()
    }

    #[test]
    fn test_abort_policy_stops_at_failing_frame() {
        let dir = scratch_dir("abort");
        let input = dir.join("input.avi");
        write_synthetic_video(&input, 10, 25.0);

        let (sink, tally) = recording_sink(None);
        let report = drive(
            &input,
            session_for(&input, Some(sink)),
            detector_failing_on(|i| i == 5),
            None,
            FailurePolicy::Abort,
        );

        assert_eq!(report.aborted_at, Some(5));
        assert_eq!(report.frames_processed, 5);
        assert_eq!(report.skipped_frames, 0);
        assert_eq!(report.wagon_count, 0);
        assert_eq!(tally.written.get(), 5);
        assert!(tally.finished.get());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_skip_policy_continues_past_failing_frames() {
        let dir = scratch_dir("skip");
        let input = dir.join("input.avi");
        let total = write_synthetic_video(&input, 10, 25.0);

        let (sink, tally) = recording_sink(None);
        let report = drive(
            &input,
            session_for(&input, Some(sink)),
            detector_failing_on(|i| i == 5 || i == 6),
            None,
            FailurePolicy::Skip,
        );

        assert_eq!(report.aborted_at, None);
        assert_eq!(report.skipped_frames, 2);
        assert_eq!(report.frames_processed as usize, total - 2);
        assert_eq!(tally.written.get(), total - 2);
        assert!(tally.finished.get());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_skip_policy_gives_up_after_consecutive_failures() {
        let dir = scratch_dir("give_up");
        let input = dir.join("input.avi");
        let total = write_synthetic_video(&input, 10, 25.0);
        assert!(total as u64 > 3 + MAX_CONSECUTIVE_FAILURES as u64);

        let report = drive(
            &input,
            session_for(&input, None),
            detector_failing_on(|i| i >= 3),
            None,
            FailurePolicy::Skip,
        );

        let last = 3 + MAX_CONSECUTIVE_FAILURES as u64 - 1;
        assert_eq!(report.aborted_at, Some(last));
        assert_eq!(report.frames_processed, 3);
        assert_eq!(report.skipped_frames, MAX_CONSECUTIVE_FAILURES as u64 - 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_output_failure_keeps_counted_events() {
        let dir = scratch_dir("sink_failure");
        let input = dir.join("input.avi");
        let events_path = dir.join("events.jsonl");
        write_synthetic_video(&input, 60, 25.0);

        let clean = drive(
            &input,
            session_for(&input, None),
            WagonDetector::new(test_config()).unwrap(),
            None,
            FailurePolicy::Abort,
        );
        assert!(!clean.events.is_empty());
        let counted_at = clean.events[0].frame_index;

        // Writing the annotated frame of the counting frame fails
        let (sink, tally) = recording_sink(Some(counted_at as usize));
        let report = drive(
            &input,
            session_for(&input, Some(sink)),
            WagonDetector::new(test_config()).unwrap(),
            Some(CountEventLog::create(&events_path).unwrap()),
            FailurePolicy::Abort,
        );

        assert_eq!(report.aborted_at, Some(counted_at));
        assert_eq!(report.wagon_count, 1);
        assert_eq!(report.events, vec![clean.events[0].clone()]);
        assert!(tally.finished.get());
        let lines = std::fs::read_to_string(&events_path).unwrap();
        assert_eq!(lines.lines().count(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unusable_frame_rate_falls_back() {
        assert_eq!(usable_fps(30.0), 30.0);
        assert_eq!(usable_fps(0.0), DEFAULT_FPS);
        assert_eq!(usable_fps(-1.0), DEFAULT_FPS);
        assert_eq!(usable_fps(f64::NAN), DEFAULT_FPS);
    }

    #[test]
    fn test_missing_input_is_video_open_error() {
        let result = process_video(
            Path::new("/definitely/not/here.mp4"),
            None,
            false,
            &test_config(),
        );
        assert!(matches!(result, Err(DetectorError::VideoOpen { .. })));
    }

    #[test]
    fn test_output_round_trip_keeps_frame_count_and_rate() {
        let dir = scratch_dir("round_trip");
        let input = dir.join("input.avi");
        let output = dir.join("annotated.avi");
        let written = write_synthetic_video(&input, 10, 25.0);

        let report = process_video(&input, Some(&output), false, &test_config()).unwrap();
        assert_eq!(report.frames_processed as usize, written);
        assert!(report.aborted_at.is_none());

        let (frames, fps) = count_frames(&output);
        assert_eq!(frames, written);
        assert!((fps - 25.0).abs() < 1e-6);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_same_input_gives_same_count() {
        let dir = scratch_dir("determinism");
        let input = dir.join("input.avi");
        write_synthetic_video(&input, 60, 25.0);

        let first = count_wagons(&input, &test_config()).unwrap();
        let second = count_wagons(&input, &test_config()).unwrap();
        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_event_log_matches_report() {
        let dir = scratch_dir("events");
        let input = dir.join("input.avi");
        let events_path = dir.join("events.jsonl");
        write_synthetic_video(&input, 60, 25.0);

        let options = ProcessOptions {
            events: Some(events_path.clone()),
            ..ProcessOptions::default()
        };
        let report = process_video_with_options(&input, &options, &test_config()).unwrap();
        let lines = std::fs::read_to_string(&events_path).unwrap();
        assert_eq!(lines.lines().count(), report.events.len());
        assert_eq!(report.events.len() as u64, report.wagon_count);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_find_video_files_skips_outputs() {
        let dir = scratch_dir("find");
        for name in ["a.mp4", "b.AVI", "processed_a.mp4", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        let processor = VideoProcessor::new(Config::default());
        let found = processor.find_video_files(&dir).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4".to_string(), "b.AVI".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_processed_output_path() {
        let mut config = Config::default();
        config.video.output_dir = "out".to_string();
        let processor = VideoProcessor::new(config);
        assert_eq!(
            processor.processed_output_path(Path::new("/data/train.mp4")),
            PathBuf::from("out/processed_train.mp4")
        );
    }
}
