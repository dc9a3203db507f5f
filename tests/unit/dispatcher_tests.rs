// Event dispatcher behavior over whole batches

use std::sync::Arc;

use kasasagi::dispatcher::RecordOutcome;
use kasasagi::event::{S3Event, S3EventRecord};
use kasasagi::notify::DisabledNotifier;
use kasasagi::storage::MemoryObjectStore;

use super::support::{
    decode_variant, dispatcher_with, harness, jpeg, png, solid_image, DEST_BUCKET, SOURCE_BUCKET,
};

fn event(keys: &[&str]) -> S3Event {
    S3Event {
        records: keys
            .iter()
            .map(|key| S3EventRecord::object_created(SOURCE_BUCKET, key))
            .collect(),
    }
}

// Test: a failing record in the middle does not stop the rest of the batch
#[tokio::test]
async fn test_failure_is_isolated_to_its_record() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "a.jpg", jpeg(640, 480));
    h.store.insert(SOURCE_BUCKET, "b.jpg", jpeg(640, 480));
    h.store.insert(SOURCE_BUCKET, "c.jpg", jpeg(640, 480));
    h.store.fail_get("b.jpg");

    let report = h.dispatcher.dispatch(&event(&["a.jpg", "b.jpg", "c.jpg"])).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.failed, 1);
    assert!(report.outcomes[0].is_processed());
    assert!(report.outcomes[1].is_failed());
    assert!(report.outcomes[2].is_processed());

    assert_eq!(
        h.store.keys(DEST_BUCKET),
        vec!["medium/a.jpg", "medium/c.jpg", "thumb/a.jpg", "thumb/c.jpg"]
    );

    let subjects: Vec<String> = h.notifier.messages().into_iter().map(|n| n.subject).collect();
    assert_eq!(
        subjects,
        vec!["Image processed", "Image processing failed", "Image processed"]
    );
    assert!(h.notifier.messages()[1]
        .message
        .starts_with("Error processing b.jpg: "));
}

// Test: a payload that is not an image produces no uploads
#[tokio::test]
async fn test_corrupt_payload_uploads_nothing() {
    let h = harness();
    h.store
        .insert(SOURCE_BUCKET, "notes.jpg", b"definitely not an image".to_vec());

    let report = h.dispatcher.dispatch(&event(&["notes.jpg"])).await;

    assert_eq!(report.failed, 1);
    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Failed { kind: "decode", .. }
    ));
    assert!(h.store.put_log().is_empty());
    let failures = h.notifier.with_subject("Image processing failed");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("Failed to decode image"));
}

// Test: an empty object is a decode failure
#[tokio::test]
async fn test_empty_object_is_decode_failure() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "empty.jpg", Vec::new());

    let report = h.dispatcher.dispatch(&event(&["empty.jpg"])).await;

    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Failed { kind: "decode", .. }
    ));
    assert!(h.store.put_log().is_empty());
}

// Test: variant keys use the decoded basename only
#[tokio::test]
async fn test_decoded_key_drives_variant_keys() {
    let h = harness();
    h.store
        .insert(SOURCE_BUCKET, "2024/vacation photo.jpg", jpeg(800, 600));

    let report = h
        .dispatcher
        .dispatch(&event(&["2024/vacation+photo.jpg"]))
        .await;

    assert_eq!(report.processed, 1);
    assert_eq!(
        h.store.keys(DEST_BUCKET),
        vec!["medium/vacation photo.jpg", "thumb/vacation photo.jpg"]
    );
    for key in h.store.keys(DEST_BUCKET) {
        let object = h.store.object(DEST_BUCKET, &key).unwrap();
        assert_eq!(object.content_type, "image/jpeg");
    }
    assert_eq!(
        h.notifier.messages()[0].message,
        "Processed 2024/vacation photo.jpg successfully."
    );
}

// Test: a square source yields square variants at the box size
#[tokio::test]
async fn test_square_source_fills_both_boxes() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "square.png", png(1000, 1000));

    h.dispatcher.dispatch(&event(&["square.png"])).await;

    assert_eq!(decode_variant(&h.store, "thumb/square.png").dimensions(), (128, 128));
    assert_eq!(decode_variant(&h.store, "medium/square.png").dimensions(), (512, 512));
}

// Test: small sources are never upscaled
#[tokio::test]
async fn test_small_source_keeps_its_size() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "icon.png", png(100, 60));

    h.dispatcher.dispatch(&event(&["icon.png"])).await;

    assert_eq!(decode_variant(&h.store, "thumb/icon.png").dimensions(), (100, 60));
    assert_eq!(decode_variant(&h.store, "medium/icon.png").dimensions(), (100, 60));
}

// Test: redelivering the same event rewrites identical variants
#[tokio::test]
async fn test_redelivery_is_idempotent() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "dup.jpg", jpeg(900, 300));

    h.dispatcher.dispatch(&event(&["dup.jpg"])).await;
    let first = h.store.object(DEST_BUCKET, "medium/dup.jpg").unwrap();
    h.dispatcher.dispatch(&event(&["dup.jpg"])).await;
    let second = h.store.object(DEST_BUCKET, "medium/dup.jpg").unwrap();

    assert_eq!(first, second);
    assert_eq!(h.store.keys(DEST_BUCKET).len(), 2);
    assert_eq!(h.store.put_log().len(), 4);
}

// Test: sources sharing a basename overwrite each other, last write wins
#[tokio::test]
async fn test_basename_collision_last_write_wins() {
    let h = harness();
    h.store.insert(
        SOURCE_BUCKET,
        "a/cat.png",
        solid_image(300, 300, [255, 0, 0], image::ImageFormat::Png),
    );
    h.store.insert(
        SOURCE_BUCKET,
        "b/cat.png",
        solid_image(300, 300, [0, 0, 255], image::ImageFormat::Png),
    );

    h.dispatcher.dispatch(&event(&["a/cat.png", "b/cat.png"])).await;

    assert_eq!(h.store.keys(DEST_BUCKET), vec!["medium/cat.png", "thumb/cat.png"]);
    let thumb = decode_variant(&h.store, "thumb/cat.png");
    let corner = thumb.get_pixel(2, 2);
    assert!(corner[2] > 200 && corner[0] < 50, "expected blue, got {:?}", corner);
}

// Test: an upload failure keeps variants already written
#[tokio::test]
async fn test_upload_failure_keeps_earlier_variants() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "partial.jpg", jpeg(700, 700));
    h.store.fail_put("medium/partial.jpg");

    let report = h.dispatcher.dispatch(&event(&["partial.jpg"])).await;

    assert!(matches!(
        report.outcomes[0],
        RecordOutcome::Failed { kind: "upload", .. }
    ));
    assert_eq!(h.store.keys(DEST_BUCKET), vec!["thumb/partial.jpg"]);
    assert_eq!(h.notifier.with_subject("Image processing failed").len(), 1);
}

// Test: a failing notification sink never changes the outcome
#[tokio::test]
async fn test_notification_failure_is_swallowed() {
    let h = harness();
    h.notifier.set_fail(true);
    h.store.insert(SOURCE_BUCKET, "ok.jpg", jpeg(200, 200));

    let report = h.dispatcher.dispatch(&event(&["ok.jpg", "missing.jpg"])).await;

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(h.notifier.failed_attempts(), 2);
    assert_eq!(h.store.keys(DEST_BUCKET).len(), 2);
}

// Test: processing works with publishing switched off
#[tokio::test]
async fn test_disabled_notifier_still_processes() {
    let store = MemoryObjectStore::new();
    store.insert(SOURCE_BUCKET, "quiet.jpg", jpeg(300, 200));
    let dispatcher = dispatcher_with(&store, Arc::new(DisabledNotifier));

    let report = dispatcher.dispatch(&event(&["quiet.jpg"])).await;

    assert_eq!(report.processed, 1);
    assert_eq!(store.keys(DEST_BUCKET).len(), 2);
}

// Test: an empty batch reports nothing and touches nothing
#[tokio::test]
async fn test_empty_batch() {
    let h = harness();
    let report = h.dispatcher.dispatch(&S3Event::default()).await;

    assert_eq!(report.total(), 0);
    assert!(h.notifier.messages().is_empty());
}

// Test: access denied on fetch surfaces as a fetch failure
#[tokio::test]
async fn test_access_denied_is_fetch_failure() {
    let h = harness();
    h.store.set_access_denied(true);

    let report = h.dispatcher.dispatch(&event(&["secret.jpg"])).await;

    match &report.outcomes[0] {
        RecordOutcome::Failed { kind, error, .. } => {
            assert_eq!(*kind, "fetch");
            assert!(error.contains("Access denied"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

// Test: the batch report serializes for the invocation response
#[tokio::test]
async fn test_report_serializes() {
    let h = harness();
    h.store.insert(SOURCE_BUCKET, "r.jpg", jpeg(256, 128));

    let report = h.dispatcher.dispatch(&event(&["r.jpg"])).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["processed"], 1);
    assert_eq!(json["outcomes"][0]["status"], "processed");
    assert_eq!(json["outcomes"][0]["variants"][0]["key"], "thumb/r.jpg");
    assert_eq!(json["outcomes"][0]["variants"][0]["width"], 128);
    assert_eq!(json["outcomes"][0]["variants"][0]["height"], 64);
}

// Test: BMP and TIFF uploads produce JPEG variants under their own names
#[tokio::test]
async fn test_bitmap_and_tiff_uploads_are_processed() {
    let h = harness();
    h.store.insert(
        SOURCE_BUCKET,
        "scans/page one.bmp",
        solid_image(300, 200, [120, 120, 120], image::ImageFormat::Bmp),
    );
    h.store.insert(
        SOURCE_BUCKET,
        "scans/page-two.tiff",
        solid_image(300, 200, [120, 120, 120], image::ImageFormat::Tiff),
    );

    let report = h
        .dispatcher
        .dispatch(&event(&["scans/page+one.bmp", "scans/page-two.tiff"]))
        .await;

    assert_eq!(report.processed, 2, "{:?}", report.outcomes);
    assert_eq!(decode_variant(&h.store, "thumb/page one.bmp").dimensions(), (128, 85));
    assert_eq!(decode_variant(&h.store, "medium/page-two.tiff").dimensions(), (300, 200));
    assert_eq!(
        h.store.object(DEST_BUCKET, "thumb/page one.bmp").unwrap().content_type,
        "image/jpeg"
    );
}
