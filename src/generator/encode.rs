//! URI encoding rules for the substituted endpoint.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left as-is when embedding the endpoint.
///
/// The `encodeURI` reserved and unreserved marks, plus `%` (every escape is
/// validated beforehand) and the `[`/`]` of IPv6 hosts. `'` stays escaped: the value lands in a quoted
/// JavaScript string.
const URI_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'(')
    .remove(b')')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'%');

/// True when every `%` starts a `%XX` escape and each run of escapes
/// decodes to UTF-8 (the `decodeURI` acceptance rule).
pub fn is_well_formed_uri(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        }

        if percent_decode_str(&s[start..i]).decode_utf8().is_err() {
            return false;
        }
    }

    true
}

/// Percent-encode a validated endpoint for embedding in the script.
pub fn encode_uri(s: &str) -> String {
    utf8_percent_encode(s, URI_ESCAPE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_uris() {
        assert!(is_well_formed_uri("http://127.0.0.1:3001/sse"));
        assert!(is_well_formed_uri("/a%20b"));
        assert!(is_well_formed_uri("/%E2%82%AC"));
        assert!(is_well_formed_uri("/ü"));
        assert!(is_well_formed_uri(""));
    }

    #[test]
    fn test_malformed_escapes() {
        assert!(!is_well_formed_uri("https://localhost:80/%%"));
        assert!(!is_well_formed_uri("/%"));
        assert!(!is_well_formed_uri("/%2"));
        assert!(!is_well_formed_uri("/%zz"));
    }

    #[test]
    fn test_escapes_must_decode_to_utf8() {
        assert!(!is_well_formed_uri("/%C3"));
        assert!(!is_well_formed_uri("/%E2%82"));
        assert!(!is_well_formed_uri("/%FF"));
        // split sequence is not reassembled across literal characters
        assert!(!is_well_formed_uri("/%C3x%BC"));
    }

    #[test]
    fn test_encode_keeps_uri_syntax() {
        assert_eq!(
            encode_uri("http://user@127.0.0.1:3001/a/b;c,d!~*()$+=&#"),
            "http://user@127.0.0.1:3001/a/b;c,d!~*()$+=&#"
        );
        assert_eq!(encode_uri("/a%20b"), "/a%20b");
    }

    #[test]
    fn test_encode_keeps_ipv6_brackets() {
        assert_eq!(
            encode_uri("http://[::1]:3001/sse"),
            "http://[::1]:3001/sse"
        );
    }

    #[test]
    fn test_encode_escapes_unsafe_characters() {
        assert_eq!(encode_uri("/a b"), "/a%20b");
        assert_eq!(encode_uri("/ü"), "/%C3%BC");
        assert_eq!(encode_uri("/'x'"), "/%27x%27");
        assert_eq!(encode_uri("/\"</script>"), "/%22%3C/script%3E");
        assert_eq!(encode_uri("/a\\b"), "/a%5Cb");
    }
}
