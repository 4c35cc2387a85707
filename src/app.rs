//! Main application module for ASL letter recognition.

use crate::{
    audio,
    config::Config,
    error::Result,
    hand_estimation::{HandEstimator, OnnxHandEstimator},
    landmarks::HandLandmarks,
    recognizer::{Classification, Recognizer},
};
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Rect, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

/// Window title for the camera view
const WINDOW_NAME: &str = "ASL Letter Recognition";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Camera index or video file path
    pub video_source: VideoSource,
    /// GUI display mode
    pub gui_mode: GuiMode,
}

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// GUI display mode
#[derive(Debug, Clone, PartialEq)]
pub enum GuiMode {
    /// Show the camera window with overlays
    Window,
    /// No GUI (headless)
    None,
}

/// Main application struct
pub struct GestureApp {
    app_config: AppConfig,
    config: Config,
    estimator: OnnxHandEstimator,
    recognizer: Recognizer,
    video_capture: VideoCapture,
    last_announced: Option<char>,
}

impl GestureApp {
    /// Create a new recognition application
    pub fn new(app_config: AppConfig, config: Config) -> Result<Self> {
        info!("Initializing ASL recognition application");

        // Initialize video capture
        let video_capture = match &app_config.video_source {
            VideoSource::Camera(index) => {
                info!("Opening camera {}", index);
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;

                // Reduce buffer size for lower latency (webcam only)
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;

                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {}", path);
                VideoCapture::from_file(path, videoio::CAP_ANY)?
            }
        };

        // Load every model artifact up front; shape mismatches abort here
        let recognizer = Recognizer::from_config(&config)?;
        let estimator = Recognizer::hand_estimator(&config)?;

        if app_config.gui_mode == GuiMode::Window {
            highgui::named_window(WINDOW_NAME, WINDOW_NORMAL)?;
        }

        Ok(Self {
            app_config,
            config,
            estimator,
            recognizer,
            video_capture,
            last_announced: None,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> Result<()> {
        info!("Starting main recognition loop");

        loop {
            // Read frame from video source
            let mut frame = Mat::default();
            if !self.video_capture.read(&mut frame)? || frame.empty() {
                if matches!(self.app_config.video_source, VideoSource::File(_)) {
                    info!("End of video file reached");
                    break;
                }
                warn!("Failed to read frame, retrying...");
                continue;
            }

            // Mirror the frame so the user sees themselves as in a mirror
            if self.config.display.flip_horizontal {
                let temp = frame.clone();
                opencv::core::flip(&temp, &mut frame, 1)?;
            }

            // A bad estimate degrades to not-detected, never ends the loop
            let hand = match self.estimator.estimate(&frame) {
                Ok(hand) => hand,
                Err(e) => {
                    warn!("hand estimation failed: {e}");
                    None
                }
            };

            let classification = match &hand {
                Some(hand) => self.recognizer.classify_landmarks(&frame, hand),
                None => Classification::not_detected(),
            };

            self.announce(&classification);

            if self.app_config.gui_mode == GuiMode::Window {
                self.draw_overlay(&mut frame, &classification, hand.as_ref())?;
                highgui::imshow(WINDOW_NAME, &frame)?;

                let key = highgui::wait_key(1)?;
                if key == 27 || key == i32::from(b'q') {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        info!("Application shutting down");
        Ok(())
    }

    /// Log the audio file for a newly stable prediction
    fn announce(&mut self, classification: &Classification) {
        if !self.config.audio.enabled {
            return;
        }
        let Some(label) = classification.label.filter(|_| classification.detected) else {
            return;
        };
        if self.last_announced == Some(label) {
            return;
        }
        self.last_announced = Some(label);
        if let Some(path) = audio::letter_audio_path(&self.config.audio.directory, label) {
            info!("announce {label}: {}", path.display());
        }
    }

    /// Draw prediction, confidence bar, and landmark points on the frame
    fn draw_overlay(&self, frame: &mut Mat, classification: &Classification, hand: Option<&HandLandmarks>) -> Result<()> {
        let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
        let red = Scalar::new(0.0, 0.0, 255.0, 0.0);
        let white = Scalar::new(255.0, 255.0, 255.0, 0.0);

        if let (true, Some(label)) = (classification.detected, classification.label) {
            let text = format!("{label} ({:.2})", classification.confidence);
            imgproc::put_text(frame, &text, Point::new(10, 30), FONT_HERSHEY_SIMPLEX, 1.0, green, 2, LINE_8, false)?;

            if self.config.display.draw_confidence_bar {
                #[allow(clippy::cast_possible_truncation)] // Confidence is in [0, 1]
                let bar_width = (200.0 * classification.confidence) as i32;
                imgproc::rectangle(frame, Rect::new(10, 50, 200, 20), white, 2, LINE_8, 0)?;
                imgproc::rectangle(frame, Rect::new(10, 50, bar_width.max(0), 20), green, -1, LINE_8, 0)?;
            }

            imgproc::put_text(
                frame,
                "Hand Detected",
                Point::new(10, 100),
                FONT_HERSHEY_SIMPLEX,
                0.7,
                green,
                2,
                LINE_8,
                false,
            )?;
        } else {
            imgproc::put_text(
                frame,
                "No Hand Detected",
                Point::new(10, 30),
                FONT_HERSHEY_SIMPLEX,
                1.0,
                red,
                2,
                LINE_8,
                false,
            )?;
        }

        if self.config.display.draw_landmarks {
            if let Some(hand) = hand {
                let width = frame.cols() as f32;
                let height = frame.rows() as f32;
                for point in hand.image.points() {
                    #[allow(clippy::cast_possible_truncation)] // Pixel coordinates
                    let center = Point::new((point.x * width) as i32, (point.y * height) as i32);
                    imgproc::circle(frame, center, 3, green, -1, LINE_8, 0)?;
                }
            }
        }

        Ok(())
    }
}
