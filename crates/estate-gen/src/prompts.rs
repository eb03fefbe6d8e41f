//! Prompt templates and fixed generation options
//!
//! The marketing copy targets Vietnamese real-estate listings, so the script
//! prompts are written in Vietnamese; the visual prompts stay in English,
//! which the image and video models handle best.

/// Video resolutions the capability accepts
pub const VIDEO_RESOLUTIONS: [&str; 2] = ["720p", "1080p"];
pub const DEFAULT_VIDEO_RESOLUTION: &str = "720p";

/// Thumbnail style vocabulary
pub const THUMBNAIL_STYLES: [&str; 7] = [
    "Luxury",
    "Modern",
    "Classic",
    "Minimalist",
    "Rustic",
    "Cyberpunk",
    "Cinematic",
];
pub const DEFAULT_THUMBNAIL_STYLE: &str = "Luxury";

pub const ASPECT_RATIO_VIDEO: &str = "16:9";
pub const ASPECT_RATIO_IMAGE: &str = "16:9";

/// Prebuilt TTS voice: gentle, professional, suits property narration
pub const VOICE_NAME: &str = "Kore";

/// Placeholder returned when the text model yields no usable script
pub const SCRIPT_FALLBACK: &str = "Không thể tạo kịch bản.";

pub const SCRIPT_SYSTEM_INSTRUCTION: &str =
    "Bạn là một nhà môi giới bất động sản tài ba. Hãy viết ngắn gọn, xúc tích.";

/// Prompt for the 30-second voiceover script
pub fn script_prompt(topic: &str) -> String {
    format!(
        "Bạn là một chuyên gia review bất động sản cao cấp hàng đầu.\n\
         Hãy viết một kịch bản video ngắn (khoảng 30 giây) để giới thiệu bất động sản sau: \"{}\".\n\n\
         Yêu cầu:\n\
         - Ngôn ngữ: Tiếng Việt.\n\
         - Văn phong: Chuyên nghiệp, lôi cuốn, nhấn mạnh vào tiềm năng đầu tư và không gian sống.\n\
         - Định dạng: Chỉ viết lời thoại (voiceover) cho người đọc, không cần chỉ dẫn cảnh.\n\
         - Bắt đầu bằng một câu hook mạnh mẽ gây tò mò.",
        topic
    )
}

/// Prompt for the listing thumbnail
pub fn thumbnail_prompt(topic: &str, style: &str) -> String {
    format!(
        "Professional architectural photography of {}. Style: {}. Wide angle lens, \
         golden hour lighting, luxury real estate listing style, high end interior \
         design or modern exterior, 8k resolution, photorealistic.",
        topic, style
    )
}

/// Prompt for the virtual-tour video
pub fn video_prompt(topic: &str) -> String {
    format!(
        "Cinematic architectural tour of {}. Smooth gimbal movement, walking through \
         the property, bright natural lighting, luxury interior design, 4k resolution, \
         slow pan showing details.",
        topic
    )
}

pub fn is_known_resolution(resolution: &str) -> bool {
    VIDEO_RESOLUTIONS.contains(&resolution)
}

pub fn is_known_style(style: &str) -> bool {
    THUMBNAIL_STYLES.contains(&style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_prompt_embeds_topic() {
        let prompt = script_prompt("Penthouse Saigon Pearl");
        assert!(prompt.contains("\"Penthouse Saigon Pearl\""));
        assert!(prompt.contains("30 giây"));
    }

    #[test]
    fn test_thumbnail_prompt_embeds_style() {
        let prompt = thumbnail_prompt("Villa Thu Duc", "Modern");
        assert!(prompt.contains("Villa Thu Duc"));
        assert!(prompt.contains("Style: Modern"));
    }

    #[test]
    fn test_video_prompt_embeds_topic() {
        assert!(video_prompt("Villa Thu Duc").contains("tour of Villa Thu Duc"));
    }

    #[test]
    fn test_known_options() {
        assert!(is_known_resolution("720p"));
        assert!(!is_known_resolution("480p"));
        assert!(is_known_style("Luxury"));
        assert!(!is_known_style("Baroque"));
        assert!(VIDEO_RESOLUTIONS.contains(&DEFAULT_VIDEO_RESOLUTION));
        assert!(THUMBNAIL_STYLES.contains(&DEFAULT_THUMBNAIL_STYLE));
    }
}
