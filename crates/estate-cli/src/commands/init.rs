//! Workspace initialization command

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let estate_dir = Path::new(".estate");
    let config_path = estate_dir.join("config.toml");

    if config_path.exists() {
        anyhow::bail!("'.estate/config.toml' already exists");
    }

    fs::create_dir_all(estate_dir.join("history"))?;

    fs::write(
        &config_path,
        r#"# Estate Vision configuration
#
# The API key can also come from the ESTATE_GEMINI_API_KEY environment
# variable or from the global config at ~/.estate/config.toml.

[providers.gemini]
# api_key = "..."
# api_url = "https://generativelanguage.googleapis.com/v1beta"
enabled = true

[generation]
provider = "gemini"
resolution = "720p"          # 720p or 1080p
thumbnail_style = "Luxury"   # Luxury, Modern, Classic, Minimalist, Rustic, Cyberpunk, Cinematic

[generation.models]
text = "gemini-2.5-flash"
image = "gemini-2.5-flash-image"
tts = "gemini-2.5-flash-preview-tts"
video = "veo-3.1-fast-generate-preview"
"#,
    )?;

    println!("Initialized .estate/ (config.toml, history/)");
    Ok(())
}
