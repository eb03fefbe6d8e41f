//! The four-stage marketing-package pipeline
//!
//! Stages run strictly in order: script, audio, thumbnail, video. The script
//! stage is fatal on failure because every later stage depends on its text;
//! the three media stages are isolated, recording an error placeholder and
//! continuing. A fixed pacing delay separates consecutive stages so the
//! capability's per-minute quota is not exceeded. After the last stage the
//! accumulated assets are archived exactly once.

use crate::client::GenerationClient;
use crate::config::CredentialGate;
use estate_asset::{Asset, AssetKind, Session, SessionStore};
use estate_core::{EstateError, Result};
use std::time::Duration;

const STAGE_DELAY_MS: u64 = 1500;

/// Pipeline state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Scripting,
    Voicing,
    Visualizing,
    Filming,
    Completed,
    Failed,
}

impl Stage {
    /// True while a run is in progress; front-ends disable new runs on this
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            Stage::Scripting | Stage::Voicing | Stage::Visualizing | Stage::Filming
        )
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Scripting => "scripting",
            Stage::Voicing => "voicing",
            Stage::Visualizing => "visualizing",
            Stage::Filming => "filming",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub resolution: String,
    pub thumbnail_style: String,
    /// Pacing delay between stages; tests pass `Duration::ZERO`
    pub stage_delay: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            resolution: crate::prompts::DEFAULT_VIDEO_RESOLUTION.to_string(),
            thumbnail_style: crate::prompts::DEFAULT_THUMBNAIL_STYLE.to_string(),
            stage_delay: Duration::from_millis(STAGE_DELAY_MS),
        }
    }
}

/// Events surfaced to the presentation boundary as a run progresses.
///
/// `SessionReady` fires as soon as the session is assembled; `SessionSaved`
/// or `SaveFailed` follows once the archive acknowledges, so display state
/// is decoupled from durability state.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    StageChanged(Stage),
    Log(String),
    AssetReady(Asset),
    SessionReady(Session),
    SessionSaved { id: String },
    SaveFailed(String),
}

/// Receives pipeline events as they happen
pub trait PipelineObserver {
    fn on_event(&mut self, event: &PipelineEvent);
}

/// Observer that discards all events
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_event(&mut self, _event: &PipelineEvent) {}
}

/// The pipeline orchestrator.
///
/// Owns the in-memory asset accumulator and log for the duration of a run;
/// `run` takes `&mut self`, so overlapping runs are unrepresentable.
pub struct Pipeline {
    client: Box<dyn GenerationClient>,
    store: SessionStore,
    gate: Box<dyn CredentialGate>,
    observer: Box<dyn PipelineObserver>,
    stage: Stage,
    log: Vec<String>,
}

impl Pipeline {
    pub fn new(
        client: Box<dyn GenerationClient>,
        store: SessionStore,
        gate: Box<dyn CredentialGate>,
    ) -> Self {
        Self {
            client,
            store,
            gate,
            observer: Box::new(NullObserver),
            stage: Stage::Idle,
            log: Vec::new(),
        }
    }

    /// Install an observer for pipeline events
    pub fn with_observer(mut self, observer: Box<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_busy(&self) -> bool {
        self.stage.is_busy()
    }

    /// The append-only run log, newest line first
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Drive the four stages for a topic and archive the completed session.
    ///
    /// Preconditions are rejected before any state is touched: an empty
    /// (after trim) topic and a missing credential leave the stage, the log
    /// and the archive exactly as they were.
    pub fn run(&mut self, topic: &str, options: &RunOptions) -> Result<Session> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(EstateError::EmptyTopic);
        }
        if !self.gate.has_credential() {
            self.gate.request_credential();
            return Err(EstateError::CredentialMissing(format!(
                "No credential for provider '{}'",
                self.client.name()
            )));
        }

        self.log.clear();
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut assets: Vec<Asset> = Vec::new();

        // Stage 1: script. Fatal on failure; everything downstream needs it.
        self.set_stage(Stage::Scripting);
        self.push_log("INITIATING ESTATE PROTOCOL...");
        self.push_log("AGENT: WRITING PROPERTY SCRIPT...");
        let script = match self.client.generate_script(topic) {
            Ok(text) => text,
            Err(e) => {
                self.push_log("CRITICAL FAILURE IN PIPELINE.");
                self.set_stage(Stage::Failed);
                return Err(e);
            }
        };
        self.add_asset(&mut assets, Asset::success(AssetKind::Script, script.clone()));
        self.push_log("SCRIPT GENERATED.");
        pace(options.stage_delay);

        // Stage 2: audio. Isolated.
        self.set_stage(Stage::Voicing);
        self.push_log("AGENT: TTS (KORE) - PROCESSING...");
        match self.client.generate_voiceover(&script) {
            Ok(uri) => {
                self.add_asset(&mut assets, Asset::success(AssetKind::Audio, uri));
                self.push_log("VOICEOVER COMPLETE.");
            }
            Err(e) => {
                self.push_log(&format!("ERROR: AUDIO GENERATION FAILED ({})", e));
                self.add_asset(&mut assets, Asset::error_placeholder(AssetKind::Audio));
            }
        }
        pace(options.stage_delay);

        // Stage 3: thumbnail. Isolated.
        self.set_stage(Stage::Visualizing);
        self.push_log(&format!(
            "AGENT: RENDERING THUMBNAIL ({})...",
            options.thumbnail_style
        ));
        match self
            .client
            .generate_thumbnail(topic, &options.thumbnail_style)
        {
            Ok(uri) => {
                self.add_asset(
                    &mut assets,
                    Asset::success(AssetKind::Thumbnail, uri).with_metadata("topic", topic),
                );
                self.push_log("THUMBNAIL RENDERED.");
            }
            Err(e) => {
                self.push_log(&format!("ERROR: THUMBNAIL FAILED ({})", e));
                self.add_asset(&mut assets, Asset::error_placeholder(AssetKind::Thumbnail));
            }
        }
        pace(options.stage_delay);

        // Stage 4: video. Isolated; last stage, no pacing delay after.
        self.set_stage(Stage::Filming);
        self.push_log(&format!(
            "AGENT: VEO ({}) - CREATING VIRTUAL TOUR...",
            options.resolution
        ));
        match self.client.generate_video(topic, &options.resolution) {
            Ok(uri) => {
                self.add_asset(&mut assets, Asset::success(AssetKind::Video, uri));
                self.push_log("VIDEO SYNTHESIS COMPLETE.");
            }
            Err(e) => {
                self.push_log(&format!("ERROR: VEO FAILED ({})", e));
                self.add_asset(&mut assets, Asset::error_placeholder(AssetKind::Video));
            }
        }

        self.set_stage(Stage::Completed);
        self.push_log("MISSION ACCOMPLISHED.");

        let session = Session::with_id(session_id, topic, assets);
        self.emit(PipelineEvent::SessionReady(session.clone()));

        // Archiving failure does not unwind a completed run
        match self.store.save(&session) {
            Ok(()) => {
                self.push_log("PROJECT ARCHIVED TO DISK.");
                self.emit(PipelineEvent::SessionSaved {
                    id: session.id.clone(),
                });
            }
            Err(e) => {
                self.push_log(&format!("ERROR: FAILED TO ARCHIVE PROJECT ({})", e));
                self.emit(PipelineEvent::SaveFailed(e.to_string()));
            }
        }

        Ok(session)
    }

    fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.emit(PipelineEvent::StageChanged(stage));
    }

    fn push_log(&mut self, msg: &str) {
        let line = format!("[{}] {}", clock_time(), msg);
        self.log.insert(0, line.clone());
        self.emit(PipelineEvent::Log(line));
    }

    fn add_asset(&mut self, assets: &mut Vec<Asset>, asset: Asset) {
        self.emit(PipelineEvent::AssetReady(asset.clone()));
        assets.push(asset);
    }

    fn emit(&mut self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }
}

fn pace(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// UTC wall-clock time as HH:MM:SS for log lines
fn clock_time() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let time_secs = secs % 86400;
    format!(
        "{:02}:{:02}:{:02}",
        time_secs / 3600,
        (time_secs % 3600) / 60,
        time_secs % 60
    )
}
