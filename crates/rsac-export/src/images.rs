//! Chart image payload decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const PNG_SIGNATURE: [u8; 4] = [0x89, b'P', b'N', b'G'];

/// One decoded chart image ready for embedding.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub title: String,
    pub png: Vec<u8>,
}

/// Decode a base64 PNG payload (with or without a `data:image/png;base64,`
/// prefix). Malformed payloads are logged and dropped; chart embedding is
/// best-effort and never fails an export.
pub fn decode_chart(title: &str, payload: &str) -> Option<ChartImage> {
    let encoded = payload
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(payload)
        .trim();

    let png = match STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(chart = title, error = %e, "Discarding malformed chart payload");
            return None;
        }
    };

    if png.len() < PNG_SIGNATURE.len() || png[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        tracing::warn!(chart = title, "Discarding chart payload that is not a PNG");
        return None;
    }

    Some(ChartImage {
        title: title.to_string(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest well-formed-enough payload: PNG signature plus padding.
    fn png_payload() -> String {
        STANDARD.encode([0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
    }

    #[test]
    fn test_decodes_plain_base64() {
        let chart = decode_chart("district", &png_payload()).unwrap();
        assert_eq!(chart.title, "district");
        assert_eq!(&chart.png[..4], &PNG_SIGNATURE);
    }

    #[test]
    fn test_decodes_data_url() {
        let payload = format!("data:image/png;base64,{}", png_payload());
        assert!(decode_chart("site", &payload).is_some());
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(decode_chart("district", "not-base64!!!").is_none());
    }

    #[test]
    fn test_rejects_non_png_bytes() {
        let payload = STANDARD.encode(b"GIF89a not a png");
        assert!(decode_chart("district", &payload).is_none());
    }
}
