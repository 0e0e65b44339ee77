//! Qdrant-backed index store
//!
//! Wraps one named collection over gRPC. Payloads cross the boundary as
//! JSON objects and are converted to and from Qdrant's value types here,
//! including the nested lists a decision record carries (rationale,
//! alternatives, tags).

use crate::errors::{PrecedentError, Result};
use crate::store::VectorStore;
use crate::types::{IndexedPoint, SearchHit};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, Condition, CreateCollectionBuilder, Distance, Filter,
    ListValue, PointId, PointStruct, SearchPointsBuilder, Struct, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::collections::HashMap;
use tracing::{debug, info};

/// Vector store backed by one Qdrant collection
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
}

impl QdrantStore {
    /// Connect to a Qdrant instance. The collection is not touched until
    /// [`VectorStore::ensure_collection`] is called.
    pub fn connect(url: &str, api_key: Option<&str>, collection: &str) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            collection: collection.to_string(),
        })
    }

    /// Collection name this store writes to
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self, dimension: u64) -> Result<()> {
        let existing = self.client.list_collections().await?;
        let exists = existing
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if exists {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        info!(collection = %self.collection, dimension, "creating collection");
        self.client
            .create_collection(
                CreateCollectionBuilder::new(self.collection.clone())
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await?;

        Ok(())
    }

    async fn upsert(&self, points: Vec<IndexedPoint>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let points: Vec<PointStruct> = points
            .into_iter()
            .map(point_to_struct)
            .collect::<Result<_>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(self.collection.clone(), points).wait(true))
            .await?;

        debug!(collection = %self.collection, count, "upserted points");
        Ok(())
    }

    async fn search(
        &self,
        vector: Vec<f32>,
        limit: usize,
        filters: Vec<(String, String)>,
    ) -> Result<Vec<SearchHit>> {
        let mut request =
            SearchPointsBuilder::new(self.collection.clone(), vector, limit as u64)
                .with_payload(true);

        if !filters.is_empty() {
            let conditions: Vec<Condition> = filters
                .into_iter()
                .map(|(field, value)| Condition::matches(field, value))
                .collect();
            request = request.filter(Filter::must(conditions));
        }

        let response = self.client.search_points(request).await?;

        let hits = response
            .result
            .into_iter()
            .map(|point| SearchHit {
                id: point_id_to_string(point.id.as_ref()),
                score: point.score,
                payload: payload_to_json(point.payload),
            })
            .collect();

        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        let info = self.client.collection_info(self.collection.as_str()).await?;
        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }
}

/// Convert an indexed point to the wire representation.
///
/// The payload must be a JSON object; the pipelines always serialize a
/// whole decision record, so anything else is a caller bug surfaced as a
/// store error.
fn point_to_struct(point: IndexedPoint) -> Result<PointStruct> {
    let fields = match point.payload {
        JsonValue::Object(fields) => fields,
        other => {
            return Err(PrecedentError::StoreError(format!(
                "point payload must be a JSON object, got: {}",
                other
            )))
        }
    };

    let payload: HashMap<String, QdrantValue> = fields
        .into_iter()
        .map(|(key, value)| (key, json_to_qdrant_value(value)))
        .collect();

    Ok(PointStruct::new(point.id, point.vector, payload))
}

fn payload_to_json(payload: HashMap<String, QdrantValue>) -> JsonValue {
    let fields: JsonMap<String, JsonValue> = payload
        .into_iter()
        .map(|(key, value)| (key, qdrant_to_json_value(value)))
        .collect();
    JsonValue::Object(fields)
}

// Helper functions for type conversions

fn json_to_qdrant_value(json: JsonValue) -> QdrantValue {
    match json {
        JsonValue::Null => QdrantValue { kind: Some(Kind::NullValue(0)) },
        JsonValue::Bool(b) => QdrantValue::from(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                QdrantValue::from(i)
            } else if let Some(f) = n.as_f64() {
                QdrantValue::from(f)
            } else {
                QdrantValue::from(0)
            }
        }
        JsonValue::String(s) => QdrantValue::from(s),
        JsonValue::Array(items) => QdrantValue {
            kind: Some(Kind::ListValue(ListValue {
                values: items.into_iter().map(json_to_qdrant_value).collect(),
            })),
        },
        JsonValue::Object(fields) => QdrantValue {
            kind: Some(Kind::StructValue(Struct {
                fields: fields
                    .into_iter()
                    .map(|(key, value)| (key, json_to_qdrant_value(value)))
                    .collect(),
            })),
        },
    }
}

fn qdrant_to_json_value(value: QdrantValue) -> JsonValue {
    match value.kind {
        None | Some(Kind::NullValue(_)) => JsonValue::Null,
        Some(Kind::BoolValue(b)) => JsonValue::Bool(b),
        Some(Kind::IntegerValue(i)) => JsonValue::Number(i.into()),
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Some(Kind::StringValue(s)) => JsonValue::String(s),
        Some(Kind::ListValue(list)) => {
            JsonValue::Array(list.values.into_iter().map(qdrant_to_json_value).collect())
        }
        Some(Kind::StructValue(fields)) => JsonValue::Object(
            fields
                .fields
                .into_iter()
                .map(|(key, value)| (key, qdrant_to_json_value(value)))
                .collect(),
        ),
    }
}

fn point_id_to_string(point_id: Option<&PointId>) -> String {
    match point_id.and_then(|id| id.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(uuid)) => uuid.clone(),
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecisionRecord;

    fn sample_payload() -> JsonValue {
        serde_json::to_value(DecisionRecord {
            title: "Use Groq".to_string(),
            date: "2024-06-01".to_string(),
            team: "Engineering".to_string(),
            rationale: vec![
                "It is fast.".to_string(),
                "The free tier covered the pilot.".to_string(),
            ],
            alternatives: vec!["OpenAI: too expensive".to_string()],
            outcome: Some("Rolled out in June".to_string()),
            tags: vec!["llm".to_string(), "infra".to_string()],
            source_file: "notes.txt".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_payload_round_trip_preserves_record() {
        let payload = sample_payload();

        let qdrant_fields: HashMap<String, QdrantValue> = match payload.clone() {
            JsonValue::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| (k, json_to_qdrant_value(v)))
                .collect(),
            _ => unreachable!(),
        };
        let restored = payload_to_json(qdrant_fields);

        let original: DecisionRecord = serde_json::from_value(payload).unwrap();
        let round_tripped: DecisionRecord = serde_json::from_value(restored).unwrap();
        assert_eq!(original, round_tripped);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(
            qdrant_to_json_value(json_to_qdrant_value(JsonValue::Null)),
            JsonValue::Null
        );
        assert_eq!(
            qdrant_to_json_value(json_to_qdrant_value(serde_json::json!(true))),
            serde_json::json!(true)
        );
        assert_eq!(
            qdrant_to_json_value(json_to_qdrant_value(serde_json::json!(42))),
            serde_json::json!(42)
        );
        assert_eq!(
            qdrant_to_json_value(json_to_qdrant_value(serde_json::json!(1.5))),
            serde_json::json!(1.5)
        );
    }

    #[test]
    fn test_nested_list_conversion() {
        let nested = serde_json::json!({"rationale": ["a", "b"], "meta": {"n": 1}});
        let converted = json_to_qdrant_value(nested.clone());
        assert_eq!(qdrant_to_json_value(converted), nested);
    }

    #[test]
    fn test_point_payload_must_be_object() {
        let point = IndexedPoint {
            id: "p1".to_string(),
            vector: vec![0.1, 0.2],
            payload: JsonValue::String("not an object".to_string()),
        };

        let err = point_to_struct(point).unwrap_err();
        assert!(matches!(err, PrecedentError::StoreError(_)));
    }

    #[test]
    fn test_point_id_rendering() {
        let uuid_id = PointId::from("3f2c71ae-1b2d-4cde-9e51-0f1e6a9c1b2d".to_string());
        assert_eq!(
            point_id_to_string(Some(&uuid_id)),
            "3f2c71ae-1b2d-4cde-9e51-0f1e6a9c1b2d"
        );

        let num_id = PointId::from(7u64);
        assert_eq!(point_id_to_string(Some(&num_id)), "7");

        assert_eq!(point_id_to_string(None), "");
    }

    #[tokio::test]
    #[ignore] // Integration test - requires Qdrant
    async fn test_ensure_upsert_search_cycle() {
        let store =
            QdrantStore::connect("http://localhost:6334", None, "precedent_store_test").unwrap();
        store.ensure_collection(4).await.unwrap();
        // Second call must be a no-op, not an error
        store.ensure_collection(4).await.unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let point = IndexedPoint {
            id: id.clone(),
            vector: vec![1.0, 0.0, 0.0, 0.0],
            payload: sample_payload(),
        };
        store.upsert(vec![point]).await.unwrap();

        let hits = store
            .search(vec![1.0, 0.0, 0.0, 0.0], 5, vec![])
            .await
            .unwrap();
        assert!(hits.iter().any(|h| h.id == id));

        let filtered = store
            .search(
                vec![1.0, 0.0, 0.0, 0.0],
                5,
                vec![("team".to_string(), "Engineering".to_string())],
            )
            .await
            .unwrap();
        assert!(filtered.iter().any(|h| h.id == id));

        assert!(store.count().await.unwrap() >= 1);
    }
}
