use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata printed by `yt-dlp --dump-json` for a single video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub fulltitle: Option<String>,
    #[serde(default)]
    pub display_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(rename = "_filename", default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub uploader_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub extractor: Option<String>,
    #[serde(default)]
    pub extractor_key: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(skip_deserializing)]
    pub file_name_without_ext: String
}

impl VideoInfo {
    /// Decodes `--dump-json` output. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut info: VideoInfo = serde_json::from_str(json)?;
        info.file_name_without_ext = info.derive_file_name_without_ext();
        Ok(info)
    }

    /// Name of the output file without directory or extension. Falls back to
    /// yt-dlp's default `%(title)s [%(id)s]` template when no filename was reported.
    pub fn derive_file_name_without_ext(&self) -> String {
        if let Some(stem) = self
            .filename
            .as_deref()
            .and_then(|name| Path::new(name).file_stem())
        {
            return stem.to_string_lossy().into_owned();
        }

        sanitize_filename(&format!("{} [{}]", self.title, self.id))
    }

    pub fn best_thumbnail(&self) -> Option<&str> {
        if let Some(ref url) = self.thumbnail {
            return Some(url);
        }
        self.thumbnails
            .iter()
            .max_by_key(|t| t.width.unwrap_or(0))
            .map(|t| t.url.as_str())
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Format {
    pub format_id: String,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub url: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_from_json_uses_reported_filename() {
        let info = VideoInfo::from_json(
            r#"{"id":"abc","title":"Clip","ext":"mp4","_filename":"/downloads/Clip [abc].mp4"}"#
        )
        .unwrap();
        assert_eq!(info.file_name_without_ext, "Clip [abc]");
        assert_eq!(info.ext.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_from_json_falls_back_to_title_and_id() {
        let info = VideoInfo::from_json(r#"{"id":"xyz","title":"AC/DC: Live?"}"#).unwrap();
        assert_eq!(info.file_name_without_ext, "AC_DC_ Live_ [xyz]");
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let info = VideoInfo::from_json(
            r#"{"id":"abc","title":"Clip","http_headers":{"Accept":"*/*"},"requested_formats":[1,2]}"#
        )
        .unwrap();
        assert_eq!(info.id, "abc");
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let result = VideoInfo::from_json(r#"{"id":"abc","title":"#);
        assert!(matches!(result, Err(Error::JsonParseFailed(_))));

        let result = VideoInfo::from_json(r#"{"id":"abc"}"#);
        assert!(matches!(result, Err(Error::JsonParseFailed(_))));
    }

    #[test]
    fn test_best_thumbnail_prefers_widest() {
        let info = VideoInfo::from_json(
            r#"{"id":"a","title":"t","thumbnails":[{"url":"small","width":120},{"url":"large","width":1280}]}"#
        )
        .unwrap();
        assert_eq!(info.best_thumbnail(), Some("large"));
    }
}
