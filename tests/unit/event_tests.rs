// Storage event parsing and key decoding

use kasasagi::event::{decode_key, S3Event, SourceObjectRef};

// Test: a console upload with spaces and unicode in the key
#[test]
fn test_decodes_console_style_event() {
    let json = r#"{
        "Records": [
            {
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-06-01T12:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "userIdentity": {"principalId": "AWS:EXAMPLE"},
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "configurationId": "variants",
                    "bucket": {
                        "name": "uploads",
                        "ownerIdentity": {"principalId": "EXAMPLE"},
                        "arn": "arn:aws:s3:::uploads"
                    },
                    "object": {
                        "key": "albums/2024/summer+trip/caf%C3%A9+night.jpg",
                        "size": 48213,
                        "eTag": "0123456789abcdef",
                        "sequencer": "0A1B2C3D4E5F678901"
                    }
                }
            }
        ]
    }"#;

    let event: S3Event = serde_json::from_str(json).unwrap();
    let source = SourceObjectRef::from_record(&event.records[0]).unwrap();

    assert_eq!(event.records[0].event_name, "ObjectCreated:Put");
    assert_eq!(source.bucket, "uploads");
    assert_eq!(source.key, "albums/2024/summer trip/café night.jpg");
}

// Test: records keep their delivery order
#[test]
fn test_multiple_records_preserve_order() {
    let json = r#"{"Records": [
        {"s3": {"bucket": {"name": "a"}, "object": {"key": "one.jpg"}}},
        {"s3": {"bucket": {"name": "b"}, "object": {"key": "two.jpg"}}},
        {"s3": {"bucket": {"name": "c"}, "object": {"key": "three.jpg"}}}
    ]}"#;

    let event: S3Event = serde_json::from_str(json).unwrap();
    let keys: Vec<String> = event
        .records
        .iter()
        .map(|r| SourceObjectRef::from_record(r).unwrap().key)
        .collect();
    assert_eq!(keys, vec!["one.jpg", "two.jpg", "three.jpg"]);
}

// Test: an encoded plus sign is kept, a bare one becomes a space
#[test]
fn test_plus_handling() {
    assert_eq!(decode_key("c%2B%2B+notes.png").unwrap(), "c++ notes.png");
    assert_eq!(decode_key("a+b+c.jpg").unwrap(), "a b c.jpg");
}

// Test: blank bucket names are rejected per record
#[test]
fn test_blank_bucket_is_invalid() {
    let event: S3Event = serde_json::from_str(
        r#"{"Records": [{"s3": {"bucket": {"name": "  "}, "object": {"key": "a.jpg"}}}]}"#,
    )
    .unwrap();
    let err = SourceObjectRef::from_record(&event.records[0]).unwrap_err();
    assert!(err.to_string().starts_with("Invalid event record"));
}
