//! Pipeline run command

use anyhow::Result;
use estate_asset::{attach_media, Asset, AssetStatus, SessionStore};
use estate_gen::clients;
use estate_gen::prompts;
use estate_gen::{
    AlwaysGranted, ConfigCredentials, CredentialGate, EstateConfig, Pipeline, PipelineEvent,
    PipelineObserver, RunOptions,
};
use std::path::Path;

pub struct GenerateArgs {
    pub topic: String,
    pub resolution: Option<String>,
    pub style: Option<String>,
    pub provider: Option<String>,
    pub attach: Vec<String>,
}

/// Prints log lines as the pipeline emits them
struct ConsoleObserver;

impl PipelineObserver for ConsoleObserver {
    fn on_event(&mut self, event: &PipelineEvent) {
        if let PipelineEvent::Log(line) = event {
            println!("> {}", line);
        }
    }
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let config = EstateConfig::load()?;

    let provider = args
        .provider
        .unwrap_or_else(|| config.default_provider().to_string());
    let resolution = args
        .resolution
        .unwrap_or_else(|| config.resolution().to_string());
    let style = args
        .style
        .unwrap_or_else(|| config.thumbnail_style().to_string());

    if !prompts::is_known_resolution(&resolution) {
        anyhow::bail!(
            "Unknown resolution '{}'. Use: {}",
            resolution,
            prompts::VIDEO_RESOLUTIONS.join(", ")
        );
    }
    if !prompts::is_known_style(&style) {
        anyhow::bail!(
            "Unknown thumbnail style '{}'. Use: {}",
            style,
            prompts::THUMBNAIL_STYLES.join(", ")
        );
    }

    // Attachments are shown alongside the results but are never part of the
    // archived session; unsupported files are reported and skipped.
    let mut attached: Vec<Asset> = Vec::new();
    for path in &args.attach {
        match attach_media(Path::new(path)) {
            Ok(asset) => {
                println!("Attached {} ({})", path, asset.kind);
                attached.push(asset);
            }
            Err(e) => eprintln!("Skipping attachment {}: {}", path, e),
        }
    }

    let client = clients::create_client(&provider, &config)?;
    let gate: Box<dyn CredentialGate> = if provider == "mock" {
        Box::new(AlwaysGranted)
    } else {
        Box::new(ConfigCredentials::from_config(&config, &provider))
    };

    let mut pipeline = Pipeline::new(client, SessionStore::default_store(), gate)
        .with_observer(Box::new(ConsoleObserver));

    let options = RunOptions {
        resolution,
        thumbnail_style: style,
        ..RunOptions::default()
    };

    let session = pipeline.run(&args.topic, &options)?;

    println!();
    for asset in attached.iter().chain(session.assets.iter()) {
        let marker = match asset.status {
            AssetStatus::Success => "ok",
            AssetStatus::Error => "FAILED",
            AssetStatus::Pending => "pending",
        };
        println!("  {:<10} {:<7} {}", asset.kind, marker, preview(&asset.payload));
    }
    println!(
        "\nSession {} archived with {} assets",
        session.id,
        session.assets.len()
    );

    Ok(())
}

/// Shorten long payloads (data URIs) for terminal display
fn preview(payload: &str) -> String {
    if payload.chars().count() <= 64 {
        payload.to_string()
    } else {
        let head: String = payload.chars().take(61).collect();
        format!("{}... ({} bytes)", head, payload.len())
    }
}
