//! Encode/decode round trips through the default pipelines.

use chrono::{FixedOffset, NaiveDate};
use typedkv::{
    decode_line, encode_line, DecodeFallback, Error, Field, Line, LineDecoder, LineEncoder,
    Timestamp, Value,
};

fn round_trip(key: &str, field: Field) -> Line<Value> {
    let encoded = encode_line(Line::KeyValue(key.to_string(), field)).unwrap();
    decode_line(&mut std::iter::once(encoded)).unwrap()
}

fn expect(key: &str, value: impl Into<Value>) -> Line<Value> {
    Line::KeyValue(key.to_string(), value.into())
}

#[test]
fn test_round_trip_int() {
    for n in [0i64, 1, -1, 42, i64::MAX, i64::MIN] {
        assert_eq!(round_trip("n", Field::from(n)), expect("n", n));
    }
}

#[test]
fn test_round_trip_float() {
    for f in [0.0, 3.14, -2.5e-8, 1e300, 0.1 + 0.2] {
        assert_eq!(round_trip("f", Field::from(f)), expect("f", f));
    }
}

#[test]
fn test_round_trip_text() {
    assert_eq!(
        round_trip("s", Field::from("héllo, 世界")),
        expect("s", "héllo, 世界")
    );
    assert_eq!(
        round_trip("s", Field::tagged("ASCII", "plain")),
        expect("s", "plain")
    );
    assert_eq!(round_trip("s", Field::from("")), expect("s", ""));
}

#[test]
fn test_round_trip_time() {
    let base = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

    let naive = Timestamp::naive(base.and_hms_opt(23, 59, 1).unwrap());
    assert_eq!(round_trip("t", Field::from(naive)), expect("t", naive));

    let fractional = Timestamp::naive(base.and_hms_micro_opt(1, 2, 3, 450_000).unwrap());
    assert_eq!(round_trip("t", Field::from(fractional)), expect("t", fractional));

    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let aware = Timestamp::with_offset(base.and_hms_micro_opt(4, 5, 6, 789).unwrap(), offset);
    assert_eq!(round_trip("t", Field::from(aware)), expect("t", aware));
}

#[test]
fn test_round_trip_unannotated_bytes() {
    assert_eq!(round_trip("b", Field::from(b"data")), expect("b", b"data"));
}

#[test]
fn test_round_trip_disabled_decoding() {
    let decoder = LineDecoder::disabled();
    let encoder = LineEncoder::new();

    let raw = Line::KeyValue("x!Q".to_string(), b"opaque".to_vec());
    let decoded = decoder.decode_line(&mut std::iter::once(raw.clone())).unwrap();
    assert_eq!(decoded, expect("x", Value::tagged("Q", b"opaque".to_vec())));

    let reencoded = encoder.encode_line(decoded.map(Field::from)).unwrap();
    assert_eq!(reencoded, raw);
}

#[test]
fn test_fallback_policies() {
    let raw = || std::iter::once(Line::KeyValue("x!Q".to_string(), b"z".to_vec()));

    assert_eq!(decode_line(&mut raw()), Err(Error::decoding("Q")));

    let pass = LineDecoder::new().fallback(DecodeFallback::PassThrough);
    assert_eq!(
        pass.decode_line(&mut raw()).unwrap(),
        expect("x", Value::tagged("Q", b"z".to_vec()))
    );

    let custom = LineDecoder::new().fallback(DecodeFallback::custom(|annotation, raw| {
        Ok(Value::Text(format!("{}={}", annotation, String::from_utf8_lossy(&raw))))
    }));
    assert_eq!(custom.decode_line(&mut raw()).unwrap(), expect("x", "Q=z"));
}

#[test]
fn test_explicit_annotation_overrides_inference() {
    let encoded = encode_line(Line::KeyValue("x".to_string(), Field::tagged("F", 1))).unwrap();
    assert_eq!(encoded, Line::KeyValue("x!F".to_string(), b"1.0".to_vec()));
    assert_eq!(
        decode_line(&mut std::iter::once(encoded)).unwrap(),
        expect("x", 1.0)
    );
}

#[test]
fn test_errors_distinguish_annotation_from_payload() {
    let bad_annotation = decode_line(&mut std::iter::once(Line::KeyValue(
        "x!Nope".to_string(),
        b"1".to_vec(),
    )))
    .unwrap_err();
    assert!(!bad_annotation.is_conversion());

    let bad_payload = decode_line(&mut std::iter::once(Line::KeyValue(
        "x!Time".to_string(),
        b"noon".to_vec(),
    )))
    .unwrap_err();
    assert!(bad_payload.is_conversion());
}

#[test]
fn test_encoder_never_writes_undecodable_time() {
    for year in [1, 9999, 10000, -1] {
        let datetime = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let field = Field::from(Timestamp::naive(datetime));
        match encode_line(Line::KeyValue("t".to_string(), field)) {
            Ok(encoded) => assert!(
                decode_line(&mut std::iter::once(encoded)).is_ok(),
                "year {} encoded but did not decode",
                year
            ),
            Err(e) => assert!(matches!(e, Error::TimeOutOfRange(_)), "year {}: {}", year, e),
        }
    }

    let year_zero = Line::KeyValue("t!T".to_string(), b"0000-01-01".to_vec());
    assert!(matches!(
        decode_line(&mut std::iter::once(year_zero)),
        Err(Error::TimeOutOfRange(_))
    ));
}

#[test]
fn test_float_exponent_form() {
    let encoded = encode_line(Line::KeyValue("f".to_string(), Field::from(1e16))).unwrap();
    assert_eq!(encoded, Line::KeyValue("f!F".to_string(), b"1e+16".to_vec()));
    assert_eq!(
        decode_line(&mut std::iter::once(encoded)).unwrap(),
        expect("f", 1e16)
    );
}
