//! Loading the logo and signature images
//!
//! An [`AssetRef`] says where the bytes live, an [`AssetSource`] knows how to
//! get them. Inline payloads are decoded without touching the source.

use std::{
    future::Future,
    path::{Path, PathBuf},
};

use base64::Engine;
use displaydoc::Display;
use thiserror::Error;

/// Why an optional image could not be used
///
/// None of these stop a document from being generated.
#[derive(Debug, Display, Error)]
pub enum AssetError {
    /// Asset {0} is unavailable: {1}
    Unavailable(String, String),
    /// Malformed inline payload: {0}
    Malformed(String),
    /// The bytes are neither PNG nor JPEG
    UnrecognizedFormat,
    /// Failed to decode image: {0}
    Decode(#[from] image::ImageError),
    /// Failed to re-encode image: {0}
    Encode(#[from] std::io::Error),
}

/// The raster formats that can be embedded
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageKind {
    /// Portable Network Graphics
    Png,
    /// JPEG/JFIF
    Jpeg,
    /// Anything else
    Unknown,
}

/// Identify an image by its leading bytes
///
/// ```
/// use contract_pdf::asset::{sniff, ImageKind};
/// assert_eq!(sniff(b"\x89PNG\r\n\x1a\n"), ImageKind::Png);
/// assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), ImageKind::Jpeg);
/// assert_eq!(sniff(&[0xFF, 0xD8, 0xFF]), ImageKind::Unknown);
/// ```
pub fn sniff(bytes: &[u8]) -> ImageKind {
    match bytes {
        [] | [_] | [_, _] | [_, _, _] => ImageKind::Unknown,
        [0x89, 0x50, 0x4E, 0x47, ..] => ImageKind::Png,
        [0xFF, 0xD8, 0xFF, ..] => ImageKind::Jpeg,
        _ => ImageKind::Unknown,
    }
}

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// A `data:` URL, e.g. `data:image/png;base64,iVBOR...`
    DataUrl(String),
    /// Base64 without any header
    Base64(String),
    /// An `http://` or `https://` URL
    Remote(String),
    /// A file on disk
    Local(PathBuf),
}

impl AssetRef {
    /// Interpret a locator as given on the command line
    ///
    /// ```
    /// use contract_pdf::asset::AssetRef;
    /// use std::path::PathBuf;
    /// assert_eq!(
    ///     AssetRef::parse("file:///srv/logo.png"),
    ///     AssetRef::Local(PathBuf::from("/srv/logo.png"))
    /// );
    /// assert!(matches!(AssetRef::parse("https://example.com/a.png"), AssetRef::Remote(_)));
    /// assert!(matches!(AssetRef::parse("assets/logo.png"), AssetRef::Local(_)));
    /// ```
    pub fn parse(locator: &str) -> Self {
        let locator = locator.trim();
        if starts_with_ignore_case(locator, "data:") {
            Self::DataUrl(locator.to_owned())
        } else if starts_with_ignore_case(locator, "http://")
            || starts_with_ignore_case(locator, "https://")
        {
            Self::Remote(locator.to_owned())
        } else if let Some(path) = locator.strip_prefix("file://") {
            Self::Local(PathBuf::from(path))
        } else {
            Self::Local(PathBuf::from(locator))
        }
    }

    /// Interpret an embedded payload (the signature field of a record)
    ///
    /// Returns `None` for blank input.
    pub fn inline(payload: &str) -> Option<Self> {
        let payload = payload.trim();
        if payload.is_empty() {
            None
        } else if starts_with_ignore_case(payload, "data:") {
            Some(Self::DataUrl(payload.to_owned()))
        } else {
            Some(Self::Base64(payload.to_owned()))
        }
    }

    /// A short description for log messages
    pub fn describe(&self) -> String {
        match self {
            Self::DataUrl(_) => String::from("<data url>"),
            Self::Base64(_) => String::from("<base64>"),
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, AssetError> {
    let compact: String = payload.split_whitespace().collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| AssetError::Malformed(e.to_string()))
}

fn decode_data_url(url: &str) -> Result<Vec<u8>, AssetError> {
    let comma = url
        .find(',')
        .ok_or_else(|| AssetError::Malformed(String::from("data URL without a comma")))?;
    let (meta, data) = (&url[..comma], &url[comma + 1..]);
    if !meta.to_ascii_lowercase().ends_with(";base64") {
        return Err(AssetError::Malformed(String::from(
            "only base64 data URLs are supported",
        )));
    }
    decode_base64(data)
}

/// # Asset Source
///
/// Something that can produce the bytes behind a file path or URL.
pub trait AssetSource {
    /// Read a local file
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, AssetError>>;

    /// Fetch a remote resource
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AssetError>>;
}

/// Resolve a reference to its bytes
///
/// This is the only place where generating a document may wait.
pub async fn load<S: AssetSource>(source: &S, asset: &AssetRef) -> Result<Vec<u8>, AssetError> {
    match asset {
        AssetRef::DataUrl(url) => decode_data_url(url),
        AssetRef::Base64(payload) => decode_base64(payload),
        AssetRef::Remote(url) => source.get(url).await,
        AssetRef::Local(path) => source.read(path).await,
    }
}

/// Assets from the local file system ([`std::fs`])
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    /// Resolve relative paths against `root`
    pub fn new(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_owned(),
        }
    }
}

impl AssetSource for FsSource {
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, AssetError>> {
        let path = self.resolve(path);
        let res = std::fs::read(&path)
            .map_err(|e| AssetError::Unavailable(path.display().to_string(), e.to_string()));
        std::future::ready(res)
    }

    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AssetError>> {
        std::future::ready(Err(AssetError::Unavailable(
            url.to_owned(),
            String::from("remote assets need the `http` feature"),
        )))
    }
}

/// Assets from the file system and over HTTP(S)
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    fs: FsSource,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Resolve relative paths against `root`
    pub fn new(root: PathBuf) -> Self {
        Self {
            fs: FsSource::new(root),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let unavailable = |e: reqwest::Error| AssetError::Unavailable(url.to_owned(), e.to_string());
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?;
        let bytes = response.bytes().map_err(unavailable)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(feature = "http")]
impl AssetSource for HttpSource {
    fn read(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>, AssetError>> {
        self.fs.read(path)
    }

    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, AssetError>> {
        // FIXME: async
        std::future::ready(self.fetch(url))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use futures_lite::future::block_on;

    use super::{load, sniff, AssetError, AssetRef, FsSource, ImageKind};

    #[test]
    fn test_sniff() {
        assert_eq!(sniff(&[]), ImageKind::Unknown);
        assert_eq!(sniff(&[0x89, 0x50, 0x4E]), ImageKind::Unknown);
        assert_eq!(sniff(&[0x89, 0x50, 0x4E, 0x47]), ImageKind::Png);
        assert_eq!(sniff(&[0xFF, 0xD8, 0xFF, 0xDB, 0x00]), ImageKind::Jpeg);
        assert_eq!(sniff(b"GIF89a"), ImageKind::Unknown);
        assert_eq!(sniff(&[1, 2, 3, 4]), ImageKind::Unknown);
    }

    #[test]
    fn test_inline() {
        assert_eq!(AssetRef::inline("  "), None);
        assert_eq!(
            AssetRef::inline("iVBORw0KGgo="),
            Some(AssetRef::Base64(String::from("iVBORw0KGgo=")))
        );
        assert!(matches!(
            AssetRef::inline("DATA:image/png;base64,AAAA"),
            Some(AssetRef::DataUrl(_))
        ));
    }

    #[test]
    fn test_load_inline() {
        let fs = FsSource::default();
        let data = AssetRef::parse("data:image/png;base64,iVBORw==");
        assert_eq!(block_on(load(&fs, &data)).unwrap(), [0x89, b'P', b'N', b'G']);

        let bare = AssetRef::Base64(String::from("/9j/\n4A=="));
        assert_eq!(block_on(load(&fs, &bare)).unwrap(), [0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_load_malformed() {
        let fs = FsSource::default();
        let plain = AssetRef::parse("data:text/plain,hello");
        assert!(matches!(
            block_on(load(&fs, &plain)),
            Err(AssetError::Malformed(_))
        ));
        let bad = AssetRef::Base64(String::from("not base64!"));
        assert!(matches!(
            block_on(load(&fs, &bad)),
            Err(AssetError::Malformed(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = std::env::temp_dir();
        let name = format!("contract-pdf-asset-{}.bin", std::process::id());
        std::fs::write(dir.join(&name), [1u8, 2, 3, 4]).unwrap();

        let fs = FsSource::new(dir.clone());
        let bytes = block_on(load(&fs, &AssetRef::Local(PathBuf::from(&name)))).unwrap();
        assert_eq!(bytes, [1, 2, 3, 4]);
        std::fs::remove_file(dir.join(&name)).unwrap();

        let missing = block_on(load(&fs, &AssetRef::Local(PathBuf::from(&name))));
        assert!(matches!(missing, Err(AssetError::Unavailable(..))));
    }

    #[test]
    fn test_remote_without_http() {
        let fs = FsSource::default();
        let remote = AssetRef::parse("https://example.com/logo.png");
        assert!(matches!(
            block_on(load(&fs, &remote)),
            Err(AssetError::Unavailable(..))
        ));
    }
}
