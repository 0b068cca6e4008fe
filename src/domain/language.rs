//! 语言名称 -> TTS locale 映射

/// 已知语言（名称, locale）
const LANGUAGE_LOCALES: &[(&str, &str)] = &[
    ("english", "en"),
    ("hindi", "hi"),
    ("spanish", "es"),
    ("french", "fr"),
    ("german", "de"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("japanese", "ja"),
    ("korean", "ko"),
    ("chinese", "zh-CN"),
    ("russian", "ru"),
    ("arabic", "ar"),
    ("bengali", "bn"),
    ("tamil", "ta"),
    ("telugu", "te"),
    ("marathi", "mr"),
    ("gujarati", "gu"),
    ("urdu", "ur"),
];

/// 将语言名称转换为 TTS locale
///
/// - 名称大小写不敏感
/// - 已经是已知 locale 的输入原样返回
/// - 未知语言返回 `default_locale`
pub fn locale_for(language: &str, default_locale: &str) -> String {
    let needle = language.trim();

    LANGUAGE_LOCALES
        .iter()
        .find(|(name, code)| name.eq_ignore_ascii_case(needle) || code.eq_ignore_ascii_case(needle))
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| default_locale.to_string())
}
