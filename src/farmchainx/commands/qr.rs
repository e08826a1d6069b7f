use crate::csv::MISSING;
use crate::error::{FarmError, Result};
use crate::record_store::RecordStore;
use crate::roles::farmer::Crop;
use crate::store::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a crop batch's QR code encodes. The consumer dashboard verifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub batch_id: String,
    pub name: String,
    pub qty: String,
    pub harvest_date: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl QrPayload {
    pub fn for_crop(crop: &Crop) -> Self {
        let or_missing = |s: &str| {
            if s.trim().is_empty() {
                MISSING.to_string()
            } else {
                s.to_string()
            }
        };
        Self {
            batch_id: crop.id.clone(),
            name: crop.name.clone(),
            qty: crop.quantity.clone(),
            harvest_date: crop
                .harvest_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            location: or_missing(&crop.farm_location),
            created_at: crop.created_at,
        }
    }

    /// Compact JSON, the string that goes into the QR image.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builds the payload for `id`, or for the selected batch when `id` is `None`.
pub fn payload<S: KeyValueStore>(store: &RecordStore<Crop, S>, id: Option<&str>) -> Result<QrPayload> {
    let crop = match id {
        Some(id) => store
            .get(id)
            .ok_or_else(|| FarmError::NotFound(id.to_string()))?,
        None => store.selected_record().ok_or(FarmError::NoSelection)?,
    };
    Ok(QrPayload::for_crop(crop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::roles::consumer::VerifiedDraft;
    use crate::roles::farmer::CropDraft;
    use crate::store::memory::MemStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn payload_for_seed_batch() {
        let storage = MemStore::new();
        let store: RecordStore<Crop, _> = RecordStore::open_at(&storage, Crop::config(), now());

        let payload = payload(&store, Some("C101")).unwrap();
        assert_eq!(payload.batch_id, "C101");
        assert_eq!(payload.qty, "200 kg");
        assert_eq!(payload.harvest_date, "2025-11-01");

        let json = payload.to_json().unwrap();
        assert!(json.starts_with(r#"{"batchId":"C101","name":"Sweet Corn""#));
    }

    #[test]
    fn payload_uses_selection() {
        let storage = MemStore::new();
        let mut store: RecordStore<Crop, _> =
            RecordStore::open_at(&storage, Crop::config(), now());

        assert!(matches!(payload(&store, None), Err(FarmError::NoSelection)));
        store.select("C103").unwrap();
        assert_eq!(payload(&store, None).unwrap().name, "Onions");
        assert!(matches!(payload(&store, Some("C9")), Err(FarmError::NotFound(_))));
    }

    #[test]
    fn missing_fields_are_marked() {
        let storage = MemStore::new();
        let mut store: RecordStore<Crop, _> =
            RecordStore::open_at(&storage, Crop::config(), now());
        let crop = store
            .create_at(
                CropDraft {
                    name: "Millet".into(),
                    quantity: "10".into(),
                    ..CropDraft::default()
                },
                now(),
            )
            .unwrap();

        let payload = payload(&store, Some(&crop.id)).unwrap();
        assert_eq!(payload.harvest_date, MISSING);
        assert_eq!(payload.location, MISSING);
    }

    #[test]
    fn consumer_can_read_farmer_payload() {
        let storage = MemStore::new();
        let store: RecordStore<Crop, _> = RecordStore::open_at(&storage, Crop::config(), now());
        let json = payload(&store, Some("C102")).unwrap().to_json().unwrap();

        let draft = VerifiedDraft::from_payload(&json).unwrap();
        assert_eq!(draft.batch_id, "C102");
        assert_eq!(draft.name, "Groundnut");
        assert_eq!(draft.location, "Block C");
    }
}
