use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FarmError, Result};
use crate::record_store::RecordStore;
use crate::roles::consumer::{Feedback, FeedbackDraft, VerifiedDraft, VerifiedProduct};
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use tracing::info;

/// Verifies a scanned QR payload and records the product.
///
/// A batch can be verified once; scanning it again is [`FarmError::AlreadyVerified`].
pub fn verify<S: KeyValueStore>(
    store: &mut RecordStore<VerifiedProduct, S>,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let draft = VerifiedDraft::from_payload(raw)?;
    if store.records().iter().any(|p| p.batch_id == draft.batch_id) {
        return Err(FarmError::AlreadyVerified(draft.batch_id));
    }

    let product = store.create_at(draft, now)?;
    info!(batch = %product.batch_id, id = %product.id, "Verified product");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Verified {} ({}) as {}",
        product.name, product.batch_id, product.id
    )));
    Ok(result)
}

/// Records feedback on the selected verified product.
pub fn submit_feedback<P: KeyValueStore, F: KeyValueStore>(
    products: &RecordStore<VerifiedProduct, P>,
    feedback: &mut RecordStore<Feedback, F>,
    rating: u8,
    comment: &str,
    now: DateTime<Utc>,
) -> Result<CmdResult> {
    let product = products.selected_record().ok_or(FarmError::NoSelection)?;
    let entry = feedback.create_at(
        FeedbackDraft {
            product_id: product.id.clone(),
            rating,
            comment: comment.to_string(),
        },
        now,
    )?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Feedback {} submitted for {}: {}/5",
        entry.id, product.name, entry.rating
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::store::memory::MemStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap()
    }

    const PAYLOAD: &str = r#"{"batchId":"C101","name":"Sweet Corn","qty":"200 kg"}"#;

    fn products(storage: &MemStore) -> RecordStore<VerifiedProduct, &MemStore> {
        RecordStore::open_at(storage, VerifiedProduct::config(), now())
    }

    fn feedback(storage: &MemStore) -> RecordStore<Feedback, &MemStore> {
        RecordStore::open_at(storage, Feedback::config(), now())
    }

    #[test]
    fn verify_records_product() {
        let storage = MemStore::new();
        let mut store = products(&storage);

        verify(&mut store, PAYLOAD, now()).unwrap();
        let product = &store.records()[0];
        assert_eq!(product.id, "V1001");
        assert_eq!(product.name, "Sweet Corn");
        assert_eq!(product.verified_at, now());
        assert_eq!(product.raw["qty"], "200 kg");
    }

    #[test]
    fn verifying_twice_is_rejected() {
        let storage = MemStore::new();
        let mut store = products(&storage);

        verify(&mut store, PAYLOAD, now()).unwrap();
        let err = verify(&mut store, PAYLOAD, now()).unwrap_err();
        assert!(matches!(err, FarmError::AlreadyVerified(ref b) if b == "C101"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_payload_changes_nothing() {
        let storage = MemStore::new();
        let mut store = products(&storage);

        assert!(matches!(
            verify(&mut store, "{oops", now()),
            Err(FarmError::InvalidPayload(_))
        ));
        assert!(store.is_empty());
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn feedback_needs_a_selected_product() {
        let storage = MemStore::new();
        let mut store = products(&storage);
        let mut entries = feedback(&storage);
        verify(&mut store, PAYLOAD, now()).unwrap();

        assert!(matches!(
            submit_feedback(&store, &mut entries, 5, "", now()),
            Err(FarmError::NoSelection)
        ));

        store.select("V1001").unwrap();
        submit_feedback(&store, &mut entries, 4, "Fresh", now()).unwrap();
        assert_eq!(entries.records()[0].product_id, "V1001");
        assert_eq!(entries.aggregate_at(now()).average_rating, Some(4.0));
    }

    #[test]
    fn feedback_rating_out_of_range() {
        let storage = MemStore::new();
        let mut store = products(&storage);
        let mut entries = feedback(&storage);
        verify(&mut store, PAYLOAD, now()).unwrap();
        store.select("V1001").unwrap();

        assert!(matches!(
            submit_feedback(&store, &mut entries, 9, "", now()),
            Err(FarmError::ValidationFailed(ref f)) if f == "rating"
        ));
        assert!(entries.is_empty());
    }

    #[test]
    fn feedback_keeps_ten_newest() {
        let storage = MemStore::new();
        let mut store = products(&storage);
        let mut entries = feedback(&storage);
        verify(&mut store, PAYLOAD, now()).unwrap();
        store.select("V1001").unwrap();

        for i in 0..12 {
            submit_feedback(&store, &mut entries, 3, &format!("note {}", i), now()).unwrap();
        }
        assert_eq!(entries.len(), 10);
        assert_eq!(entries.records()[0].comment, "note 11");
        assert_eq!(entries.records()[9].comment, "note 2");
    }
}
