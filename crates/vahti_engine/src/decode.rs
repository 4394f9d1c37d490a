use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use vahti_logging::vahti_debug;

/// Page bytes decoded into UTF-8, with the encoding that was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub html: String,
    pub encoding_label: String,
}

/// Decodes page bytes to text. Encoding selection order: byte-order mark,
/// then the `Content-Type` charset parameter, then statistical detection.
/// Never fails; undecodable sequences become replacement characters.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> DecodedPage {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, encoding);
        }
        vahti_debug!("unrecognized charset label {label:?}; falling back to detection");
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedPage {
    let (text, actual, had_errors) = encoding.decode(bytes);
    if had_errors {
        vahti_debug!(
            "decoded as {} with replacement characters",
            actual.name()
        );
    }
    DecodedPage {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
    }
}

/// Pulls the charset parameter out of a `Content-Type` value such as
/// `text/html; charset=ISO-8859-1`.
fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        let (name, value) = part.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\''].as_ref());
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}
