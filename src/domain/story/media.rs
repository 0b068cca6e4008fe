//! 媒体引用：音频播放地址、配图查询词与兜底图片地址

use super::StoryId;

/// 兜底图片模板中的关键词占位符
pub const KEYWORDS_PLACEHOLDER: &str = "{keywords}";

/// 默认兜底图片模板（无需鉴权的随机图片）
pub const DEFAULT_FALLBACK_IMAGE_TEMPLATE: &str = "https://source.unsplash.com/800x600/?{keywords}";

/// 故事音频播放地址
pub fn audio_playback_url(base_url: &str, story_id: &StoryId) -> String {
    format!("{}/api/story/audio/{}", base_url.trim_end_matches('/'), story_id)
}

/// "音频不可用" 兜底地址
pub fn audio_unavailable_url(base_url: &str) -> String {
    format!("{}/api/story/audio/unavailable", base_url.trim_end_matches('/'))
}

/// 图片搜索查询词：title + theme + genre
pub fn image_search_query(title: &str, theme: &str, genre: &str) -> String {
    [title, theme, genre]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL 关键词：非空项以 `+` 连接，内部空格替换为 `+`
pub fn image_keywords(title: &str, theme: &str, genre: &str) -> String {
    let keywords = [title, theme, genre]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join("+"))
        .collect::<Vec<_>>()
        .join("+");

    if keywords.is_empty() {
        "story".to_string()
    } else {
        keywords
    }
}

/// 兜底图片地址
pub fn fallback_image_url(template: &str, title: &str, theme: &str, genre: &str) -> String {
    template.replace(KEYWORDS_PLACEHOLDER, &image_keywords(title, theme, genre))
}
