//! Base64 `data:` URIs, the inline form cover pictures and avatars are
//! stored and rendered in when no external URL is involved.

/// Builds a `data:` URI from raw bytes and their declared MIME type.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, base64::encode(bytes))
}

/// Splits a base64 `data:` URI back into its MIME type and raw bytes.
///
/// Returns `None` for external URLs and for data URIs that are not
/// base64-encoded.
pub fn parse(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let comma = rest.find(',')?;
    let (header, payload) = (&rest[..comma], &rest[comma + 1..]);
    let mime = header.strip_suffix(";base64")?;
    let bytes = base64::decode(payload).ok()?;
    Some((mime.to_owned(), bytes))
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_parse() {
        let uri = encode("image/png", b"not a real png");
        assert_eq!(uri, "data:image/png;base64,bm90IGEgcmVhbCBwbmc=");
        let (mime, bytes) = parse(&uri).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"not a real png");
    }

    #[test]
    fn parse_rejects_non_data_uris() {
        let tests = vec![
            "https://example.com/cover.png",
            "data:image/png,raw-not-base64",
            "data:image/png;base64,???",
            "",
        ];
        for uri in tests {
            assert!(parse(uri).is_none(), "should reject {:?}", uri);
        }
    }

    #[test]
    fn is_data_uri_only_matches_data_scheme() {
        assert!(is_data_uri("data:image/gif;base64,"));
        assert!(!is_data_uri("https://example.com/a.gif"));
        assert!(!is_data_uri(""));
    }
}
