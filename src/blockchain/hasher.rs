//! Canonical block serialization and digest.
//!
//! Two nodes only agree on a chain if they agree byte-for-byte on how a block
//! is rendered before hashing. The canonical form is JSON with:
//! - object keys sorted at every depth,
//! - `", "` and `": "` separators,
//! - every character outside printable ASCII written as a `\uXXXX` escape,
//! - integers verbatim at any width,
//! - floats in shortest round-trip form (`1700000000.5`, `5.0`, `1e-05`, `1e+16`).

use std::io::{self, Write};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};

use super::Block;

/// Hex-encoded SHA-256 of the block's canonical JSON.
pub fn digest(block: &Block) -> String {
    let canonical = canonical_json(block).expect("block fields are JSON-representable");
    hex::encode(Sha256::digest(&canonical))
}

/// Render any serializable value in canonical form.
pub fn canonical_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    SortedKeys(&value).serialize(&mut ser)?;
    Ok(out)
}

/// Walks a `Value` emitting object entries in key order regardless of how the
/// map stores them.
struct SortedKeys<'a>(&'a Value);

impl Serialize for SortedKeys<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let mut entries: Vec<_> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    out.serialize_entry(key, &SortedKeys(value))?;
                }
                out.end()
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(SortedKeys)),
            other => other.serialize(serializer),
        }
    }
}

struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    // Numbers keep their source text, so integers are never squeezed through
    // a machine type. Anything with a fraction or exponent is a float.
    fn write_number_str<W: ?Sized + Write>(&mut self, writer: &mut W, value: &str) -> io::Result<()> {
        if !value.contains(['.', 'e', 'E']) {
            let value = if value == "-0" { "0" } else { value };
            return writer.write_all(value.as_bytes());
        }
        let float: f64 = value
            .parse()
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, format!("bad number {value:?}")))?;
        let text = if float.is_infinite() {
            let sign = if float.is_sign_negative() { "-" } else { "" };
            format!("{sign}Infinity")
        } else {
            float_repr(float)
        };
        writer.write_all(text.as_bytes())
    }

    // Quotes, backslashes and C0 controls arrive through `write_char_escape`;
    // everything else lands here, including DEL and non-ASCII.
    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (at, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..at].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = at + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Shortest round-trip decimal text for a finite float, switching to exponent
/// notation when the decimal point would sit before the 4th fractional zero
/// or beyond the 16th digit.
fn float_repr(value: f64) -> String {
    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7" or "5e0".
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let point = exponent + 1;

    let body = if !(-3..=16).contains(&point) {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() { String::new() } else { format!(".{tail}") };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!("{head}{fraction}e{exp_sign}{:02}", exponent.unsigned_abs())
    } else if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if digits.len() <= point as usize {
        format!("{digits}{}.0", "0".repeat(point as usize - digits.len()))
    } else {
        let (int, fraction) = digits.split_at(point as usize);
        format!("{int}.{fraction}")
    };
    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_JSON: &str = r#"{"index":1,"timestamp":1700000000.5,"transactions":[],"seal":100,"previous_hash":1}"#;
    const GENESIS_DIGEST: &str = "3645597b6b4cee0d243ea331f48429ed5290c0428581ab1e8ef1220187e9619c";

    fn block(json: &str) -> Block {
        serde_json::from_str(json).expect("valid block json")
    }

    #[test]
    fn genesis_renders_canonically() {
        let rendered = canonical_json(&block(GENESIS_JSON)).unwrap();
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            r#"{"index": 1, "previous_hash": 1, "seal": 100, "timestamp": 1700000000.5, "transactions": []}"#
        );
        assert_eq!(digest(&block(GENESIS_JSON)), GENESIS_DIGEST);
    }

    #[test]
    fn digest_ignores_field_order() {
        let shuffled = block(
            r#"{"previous_hash":1,"transactions":[],"timestamp":1700000000.5,"seal":100,"index":1}"#,
        );
        assert_eq!(digest(&shuffled), GENESIS_DIGEST);
    }

    #[test]
    fn linked_block_with_unicode_recipient() {
        let json = format!(
            r#"{{"transactions":[{{"recipient":"b","sender":"a","amount":5}},{{"sender":"0","amount":1,"recipient":"néode"}}],
                "seal":35293,"index":2,"timestamp":1700000060.25,"previous_hash":"{GENESIS_DIGEST}"}}"#
        );
        let b = block(&json);
        let rendered = String::from_utf8(canonical_json(&b).unwrap()).unwrap();
        assert!(rendered.contains(r#""recipient": "n\u00e9ode""#));
        assert_eq!(
            digest(&b),
            "58a1d30a96b1c0104a32c46004e77b15437934f2a35165d5078942b08d36de45"
        );
    }

    #[test]
    fn astral_chars_escape_as_surrogate_pairs() {
        let rendered = canonical_json(&"a\u{1F980}\u{7f}").unwrap();
        assert_eq!(rendered, br#""a\ud83e\udd80\u007f""#);
    }

    #[test]
    fn integers_wider_than_u64_render_verbatim() {
        let json = r#"{"index":2,"timestamp":1700000000.5,"previous_hash":"ab","seal":35293,
            "transactions":[{"sender":"a","recipient":"b","amount":1180591620717411303424},
                            {"sender":"c","recipient":"d","amount":-36893488147419103232}]}"#;
        let rendered = String::from_utf8(canonical_json(&block(json)).unwrap()).unwrap();
        assert!(rendered.contains(r#""amount": 1180591620717411303424"#), "{rendered}");
        assert!(rendered.contains(r#""amount": -36893488147419103232"#), "{rendered}");
    }

    #[test]
    fn integer_timestamp_is_not_turned_into_a_float() {
        let b = block(r#"{"index":1,"timestamp":1700000000,"transactions":[],"seal":100,"previous_hash":1}"#);
        let rendered = String::from_utf8(canonical_json(&b).unwrap()).unwrap();
        assert!(rendered.contains(r#""timestamp": 1700000000,"#), "{rendered}");
    }

    #[test]
    fn float_text_is_normalized() {
        for (source, expected) in [
            ("1.50", "1.5"),
            ("1E2", "100.0"),
            ("2.5e-7", "2.5e-07"),
            ("-0.0", "-0.0"),
            ("-0", "0"),
            ("1e400", "Infinity"),
        ] {
            let number: serde_json::Value = serde_json::from_str(source).unwrap();
            assert_eq!(canonical_json(&number).unwrap(), expected.as_bytes(), "{source}");
        }
    }

    #[test]
    fn float_repr_matches_shortest_form() {
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.00001), "1e-05");
        assert_eq!(float_repr(5.0), "5.0");
        assert_eq!(float_repr(-0.0), "-0.0");
        assert_eq!(float_repr(1700000000.123456), "1700000000.123456");
        assert_eq!(float_repr(123456789012345.6), "123456789012345.6");
        assert_eq!(float_repr(-2.5e-7), "-2.5e-07");
    }
}
