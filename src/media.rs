//! Media kinds, file naming and content classification.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a generation tool produces. Fixes the extension and fallback name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Music,
    SoundEffect,
    Speech,
    Subtitle,
}

impl MediaKind {
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Image => "png",
            MediaKind::Video => "mp4",
            MediaKind::Music | MediaKind::SoundEffect | MediaKind::Speech => "mp3",
            MediaKind::Subtitle => "srt",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Music => "music",
            MediaKind::SoundEffect => "sfx",
            MediaKind::Speech => "speech",
            MediaKind::Subtitle => "subtitles",
        }
    }

    /// `<dir>/<name>.<ext>` from an explicit name, or `<prefix>_<timestamp>.<ext>`.
    pub fn output_path(self, dir: &Path, name: Option<&str>, now: DateTime<Utc>) -> PathBuf {
        let ext = self.extension();
        let stem = name
            .map(|n| strip_extension(n.trim(), ext))
            .map(sanitize_file_stem)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{}_{}", self.prefix(), now.format("%Y%m%d_%H%M%S")));
        dir.join(format!("{stem}.{ext}"))
    }
}

fn strip_extension<'a>(name: &'a str, ext: &str) -> &'a str {
    match name.rsplit_once('.') {
        Some((stem, found)) if found.eq_ignore_ascii_case(ext) => stem,
        _ => name,
    }
}

/// Keep names inside the output directory: path separators and other
/// troublesome characters become `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | ' ' => c,
            _ if c.is_alphanumeric() => c,
            _ => '_',
        })
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == ' ')
        .to_string()
}

/// Coarse content type recorded in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
    Audio,
    Subtitle,
    Other,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::Audio => "audio",
            ContentKind::Subtitle => "subtitle",
            ContentKind::Other => "other",
        };
        f.write_str(label)
    }
}

impl ContentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "webp" | "gif" | "bmp" => ContentKind::Image,
            "mp4" | "mov" | "webm" | "mkv" | "avi" => ContentKind::Video,
            "mp3" | "wav" | "m4a" | "flac" | "ogg" | "opus" | "aac" => ContentKind::Audio,
            "srt" | "vtt" | "ass" => ContentKind::Subtitle,
            _ => ContentKind::Other,
        }
    }
}

/// MIME type inferred from a file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "aac" => "audio/aac",
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt",
        "ass" => "text/x-ssa",
        _ => "application/octet-stream",
    }
}
