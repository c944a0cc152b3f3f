//! Shared on-disk format helpers
//!
//! All content files are RON (Rusty Object Notation).
//! - Reading: auto-detects plain or brotli-compressed RON
//! - Writing: plain for hand-edited sources, brotli for compiled output

use std::io::Cursor;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GridError, Result};

/// Pretty printer settings shared by every writer
pub fn pretty_config() -> ron::ser::PrettyConfig {
    ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string())
}

/// Plain RON starts with '(' or whitespace, brotli is binary
pub fn is_plain_ron(bytes: &[u8]) -> bool {
    bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t')
        .unwrap_or(false)
}

/// Turn file contents into RON text, decompressing if needed
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if is_plain_ron(bytes) {
        return String::from_utf8(bytes.to_vec()).map_err(|e| {
            GridError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("invalid UTF-8: {}", e),
            ))
        });
    }

    let mut decompressed = Vec::new();
    brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed).map_err(|e| {
        GridError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("brotli decompression failed: {}", e),
        ))
    })?;
    String::from_utf8(decompressed).map_err(|e| {
        GridError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("invalid UTF-8 after decompression: {}", e),
        ))
    })
}

/// Parse RON text, reporting the offending line on stderr
pub fn parse_ron<T: DeserializeOwned>(contents: &str, origin: &str) -> Result<T> {
    match ron::from_str(contents) {
        Ok(value) => Ok(value),
        Err(e) => {
            eprintln!("RON parse error in {}: {}", origin, e);
            let pos = e.position;
            let line_idx = pos.line.saturating_sub(1);
            if let Some(line) = contents.lines().nth(line_idx) {
                eprintln!("  Line {}: {}", pos.line, line);
            }
            Err(e.into())
        }
    }
}

pub fn to_ron_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(ron::ser::to_string_pretty(value, pretty_config())?)
}

/// Serialize and compress with brotli
pub fn to_compressed<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let ron_string = to_ron_string(value)?;

    // quality 6, window 22: good balance of speed/ratio
    let mut compressed = Vec::new();
    brotli::BrotliCompress(
        &mut Cursor::new(ron_string.as_bytes()),
        &mut compressed,
        &brotli::enc::BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        },
    )
    .map_err(|e| {
        GridError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("brotli compression failed: {}", e),
        ))
    })?;

    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        size: f32,
    }

    #[test]
    fn test_plain_detection() {
        assert!(is_plain_ron(b"(name: \"a\")"));
        assert!(is_plain_ron(b"\n(name: \"a\")"));
        assert!(!is_plain_ron(b""));
        assert!(!is_plain_ron(&[0x1b, 0x00]));
    }

    #[test]
    fn test_compressed_is_readable() {
        let sample = Sample {
            name: "forest".to_string(),
            size: 16.0,
        };
        let bytes = to_compressed(&sample).unwrap();
        assert!(!is_plain_ron(&bytes));

        let text = decode_text(&bytes).unwrap();
        let back: Sample = parse_ron(&text, "test").unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = to_ron_string(&Sample {
            name: "a".to_string(),
            size: 1.0,
        })
        .unwrap();
        assert_eq!(decode_text(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_garbage_fails() {
        let result = decode_text(&[0xde, 0xad, 0xbe, 0xef])
            .and_then(|text| parse_ron::<Sample>(&text, "test"));
        assert!(result.is_err());
        assert!(parse_ron::<Sample>("(name: 3)", "test").is_err());
    }
}
