//! Font asset resolution.
//!
//! A caption font is referenced three ways:
//!
//! - **Named**: a display name resolved inside a fonts directory
//!   (`"Reenie Beanie"` → `fonts/ReenieBeanie-Regular.ttf`)
//! - **Path**: an explicit `.ttf`/`.otf` file path
//! - **URL**: an `http(s)` address fetched once into memory
//!
//! [`FontCache`] holds resolved bytes keyed by source, so repeated
//! compositions reuse them instead of re-reading or re-fetching. Failure to
//! resolve or parse is always surfaced as a [`FontError`]; there is no silent
//! fallback font.

use rusttype::Font;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Upper bound on a URL font fetch; a dead host is a font-unavailable error,
/// not a hang.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum FontError {
    #[error("font not found: {0} (looked for {1})")]
    NotFound(String, String),
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to fetch font from {url}: {source}")]
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    #[error("font data from {0} could not be parsed")]
    Parse(String),
}

/// Where a font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Display name looked up in a fonts directory.
    Named { name: String, fonts_dir: PathBuf },
    /// Explicit font file path.
    File(PathBuf),
    /// Remote font fetched over HTTP(S).
    Url(String),
}

impl FontSource {
    /// Classify a user-supplied font reference.
    ///
    /// URLs are detected by scheme; anything naming an existing file or
    /// carrying a font extension is a path; everything else is a display
    /// name resolved inside `fonts_dir`.
    pub fn from_reference(reference: &str, fonts_dir: &Path) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return FontSource::Url(reference.to_string());
        }
        let path = Path::new(reference);
        let has_font_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
        if has_font_ext || path.exists() {
            return FontSource::File(path.to_path_buf());
        }
        FontSource::Named {
            name: reference.to_string(),
            fonts_dir: fonts_dir.to_path_buf(),
        }
    }

    fn cache_key(&self) -> String {
        match self {
            FontSource::Named { name, fonts_dir } => {
                format!("named:{}:{}", fonts_dir.display(), name)
            }
            FontSource::File(path) => format!("file:{}", path.display()),
            FontSource::Url(url) => format!("url:{url}"),
        }
    }
}

/// Candidate file names a display name resolves to, in probe order.
fn named_candidates(name: &str) -> Vec<String> {
    let compact: String = name.split_whitespace().collect();
    vec![
        name.to_string(),
        format!("{name}.ttf"),
        format!("{name}.otf"),
        format!("{compact}-Regular.ttf"),
        format!("{compact}.ttf"),
    ]
}

fn resolve_named(name: &str, fonts_dir: &Path) -> Result<Vec<u8>, FontError> {
    let candidates = named_candidates(name);
    for candidate in &candidates {
        let path = fonts_dir.join(candidate);
        if path.is_file() {
            return std::fs::read(&path).map_err(|source| FontError::Io { path, source });
        }
    }
    Err(FontError::NotFound(
        name.to_string(),
        candidates
            .iter()
            .map(|c| fonts_dir.join(c).display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

fn fetch_url(url: &str) -> Result<Vec<u8>, FontError> {
    let wrap = |source| FontError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(wrap)?;
    let response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?;
    Ok(response.bytes().map_err(wrap)?.to_vec())
}

fn resolve_bytes(source: &FontSource) -> Result<Vec<u8>, FontError> {
    match source {
        FontSource::Named { name, fonts_dir } => resolve_named(name, fonts_dir),
        FontSource::File(path) => std::fs::read(path).map_err(|source| FontError::Io {
            path: path.clone(),
            source,
        }),
        FontSource::Url(url) => fetch_url(url),
    }
}

/// Fetch-once font byte cache.
///
/// Bytes are validated (parsed) before being cached, so a cache hit always
/// parses. Each [`load`](Self::load) hands out an owned `Font<'static>` built
/// from the cached bytes.
#[derive(Default)]
pub struct FontCache {
    bytes: HashMap<String, Vec<u8>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve and parse a font, reusing previously resolved bytes.
    pub fn load(&mut self, source: &FontSource) -> Result<Font<'static>, FontError> {
        let key = source.cache_key();
        if !self.bytes.contains_key(&key) {
            let bytes = resolve_bytes(source)?;
            // Validate before caching so the cache never holds garbage
            Font::try_from_vec(bytes.clone()).ok_or_else(|| FontError::Parse(key.clone()))?;
            self.bytes.insert(key.clone(), bytes);
        }
        let bytes = self.bytes[&key].clone();
        Font::try_from_vec(bytes).ok_or(FontError::Parse(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_FONT: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSans.ttf"
    );

    #[test]
    fn reference_classification() {
        let dir = Path::new("fonts");
        assert!(matches!(
            FontSource::from_reference("https://example.com/f.ttf", dir),
            FontSource::Url(_)
        ));
        assert!(matches!(
            FontSource::from_reference("assets/MyFont.otf", dir),
            FontSource::File(_)
        ));
        assert_eq!(
            FontSource::from_reference("Reenie Beanie", dir),
            FontSource::Named {
                name: "Reenie Beanie".into(),
                fonts_dir: dir.into()
            }
        );
    }

    #[test]
    fn named_candidates_include_compact_regular() {
        let candidates = named_candidates("Permanent Marker");
        assert!(candidates.contains(&"PermanentMarker-Regular.ttf".to_string()));
        assert!(candidates.contains(&"Permanent Marker.ttf".to_string()));
    }

    #[test]
    fn load_from_file_path() {
        let mut cache = FontCache::new();
        let font = cache.load(&FontSource::File(FIXTURE_FONT.into()));
        assert!(font.is_ok());
    }

    #[test]
    fn load_named_from_fonts_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::copy(FIXTURE_FONT, tmp.path().join("DejaVuSans-Regular.ttf")).unwrap();

        let mut cache = FontCache::new();
        let source = FontSource::Named {
            name: "DejaVu Sans".into(),
            fonts_dir: tmp.path().to_path_buf(),
        };
        assert!(cache.load(&source).is_ok());
    }

    #[test]
    fn missing_named_font_is_not_found() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut cache = FontCache::new();
        let source = FontSource::Named {
            name: "No Such Font".into(),
            fonts_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(
            cache.load(&source),
            Err(FontError::NotFound(name, _)) if name == "No Such Font"
        ));
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.ttf");
        std::fs::write(&path, b"this is not a font").unwrap();

        let mut cache = FontCache::new();
        assert!(matches!(
            cache.load(&FontSource::File(path)),
            Err(FontError::Parse(_))
        ));
    }

    #[test]
    fn cache_survives_source_deletion() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("cached.ttf");
        std::fs::copy(FIXTURE_FONT, &path).unwrap();

        let mut cache = FontCache::new();
        let source = FontSource::File(path.clone());
        cache.load(&source).unwrap();

        // Second load must come from the cache, not the filesystem
        std::fs::remove_file(&path).unwrap();
        assert!(cache.load(&source).is_ok());
    }
}
