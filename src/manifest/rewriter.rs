//! HLS manifest rewriting.
//!
//! # Responsibilities
//! - Reject bodies that do not start with `#EXTM3U`
//! - Upgrade `#EXT-X-VERSION:3` to `#EXT-X-VERSION:7`
//! - Insert the content-steering directive as the second line
//!
//! # Design Decisions
//! - Byte-level substitution only, no playlist parsing or decoding; bytes
//!   outside the markers are copied unchanged, whatever their encoding
//! - Every textual occurrence of the old version tag is replaced
//! - Only the first header occurrence receives the directive

use bytes::Bytes;
use thiserror::Error;

use crate::config::SteeringConfig;

/// Marker every HLS playlist must start with.
pub const HEADER_MARKER: &str = "#EXTM3U";
pub const OLD_VERSION_MARKER: &str = "#EXT-X-VERSION:3";
pub const NEW_VERSION_MARKER: &str = "#EXT-X-VERSION:7";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest does not start with #EXTM3U")]
    MissingHeader,
}

/// Rewrites fetched manifests. Holds only the directive line.
#[derive(Debug, Clone)]
pub struct ManifestRewriter {
    directive: String,
}

impl ManifestRewriter {
    /// Create a rewriter inserting `directive` verbatim.
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
        }
    }

    pub fn from_config(config: &SteeringConfig) -> Self {
        Self::new(config.directive())
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Produce the rewritten manifest or fail without partial output.
    pub fn rewrite(&self, raw: &[u8]) -> Result<Bytes, ManifestError> {
        let rest = raw
            .strip_prefix(HEADER_MARKER.as_bytes())
            .ok_or(ManifestError::MissingHeader)?;

        let mut out = Vec::with_capacity(raw.len() + self.directive.len() + 1);
        out.extend_from_slice(HEADER_MARKER.as_bytes());
        out.push(b'\n');
        out.extend_from_slice(self.directive.as_bytes());
        upgrade_version(rest, &mut out);
        Ok(Bytes::from(out))
    }
}

/// Append `text` to `out` with every `#EXT-X-VERSION:3` replaced.
fn upgrade_version(text: &[u8], out: &mut Vec<u8>) {
    let old = OLD_VERSION_MARKER.as_bytes();
    let mut remaining = text;

    while let Some(idx) = remaining.windows(old.len()).position(|w| w == old) {
        out.extend_from_slice(&remaining[..idx]);
        out.extend_from_slice(NEW_VERSION_MARKER.as_bytes());
        remaining = &remaining[idx + old.len()..];
    }
    out.extend_from_slice(remaining);
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIVE: &str = r#"#EXT-X-CONTENT-STEERING:SERVER-URI="https://steer.example/hls.hcsm",PATHWAY-ID="cdn-a""#;

    fn rewriter() -> ManifestRewriter {
        ManifestRewriter::new(DIRECTIVE)
    }

    #[test]
    fn test_directive_becomes_second_line() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-STREAM-INF:BANDWIDTH=1\nlow.m3u8\n";
        let out = rewriter().rewrite(raw).unwrap();
        let text = std::str::from_utf8(&out).unwrap();

        let expected = format!(
            "#EXTM3U\n{DIRECTIVE}\n#EXT-X-VERSION:7\n#EXT-X-STREAM-INF:BANDWIDTH=1\nlow.m3u8\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_every_old_version_replaced() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-VERSION:3\n";
        let out = rewriter().rewrite(raw).unwrap();
        let text = std::str::from_utf8(&out).unwrap();

        assert_eq!(text.matches(NEW_VERSION_MARKER).count(), 2);
        assert!(!text.contains(OLD_VERSION_MARKER));
    }

    #[test]
    fn test_version_substitution_is_textual() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:30\n#EXT-X-VERSION:4\n";
        let out = rewriter().rewrite(raw).unwrap();
        let text = std::str::from_utf8(&out).unwrap();

        assert!(text.contains("#EXT-X-VERSION:70\n"));
        assert!(text.contains("#EXT-X-VERSION:4\n"));
        assert!(!text.contains(OLD_VERSION_MARKER));
    }

    #[test]
    fn test_only_first_header_gets_directive() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:3\n#EXTM3U\n";
        let out = rewriter().rewrite(raw).unwrap();
        let text = std::str::from_utf8(&out).unwrap();

        assert_eq!(text.matches(DIRECTIVE).count(), 1);
        assert!(text.ends_with("#EXT-X-VERSION:7\n#EXTM3U\n"));
    }

    #[test]
    fn test_header_only_manifest() {
        let out = rewriter().rewrite(b"#EXTM3U").unwrap();
        assert_eq!(out, format!("#EXTM3U\n{DIRECTIVE}").into_bytes());
    }

    #[test]
    fn test_rejects_missing_header() {
        assert_eq!(rewriter().rewrite(b"<MPD></MPD>"), Err(ManifestError::MissingHeader));
        assert_eq!(rewriter().rewrite(b""), Err(ManifestError::MissingHeader));
        assert_eq!(
            rewriter().rewrite(b"\n#EXTM3U\n"),
            Err(ManifestError::MissingHeader)
        );
    }

    #[test]
    fn test_non_utf8_bytes_are_kept() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-MEDIA:TYPE=AUDIO,NAME=\"Espa\xf1ol\"\n";
        let out = rewriter().rewrite(raw).unwrap();

        let mut expected = format!("#EXTM3U\n{DIRECTIVE}\n#EXT-X-VERSION:7\n").into_bytes();
        expected.extend_from_slice(b"#EXT-X-MEDIA:TYPE=AUDIO,NAME=\"Espa\xf1ol\"\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_output_length_reflects_insertion() {
        let raw = b"#EXTM3U\n#EXT-X-VERSION:3\n";
        let out = rewriter().rewrite(raw).unwrap();
        assert_eq!(out.len(), raw.len() + DIRECTIVE.len() + 1);
    }
}
