//! Qdrant-backed implementation of [`VectorStore`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointId, PointStruct, SearchPointsBuilder,
    UpsertPointsBuilder, VectorParamsBuilder, point_id::PointIdOptions, value::Kind,
};

use crate::vector_store::{ScoredVectorPoint, VectorPoint, VectorStore, VectorStoreError};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub struct QdrantStore {
    client: Qdrant,
}

impl std::fmt::Debug for QdrantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantStore").finish_non_exhaustive()
    }
}

impl QdrantStore {
    /// Create a new `QdrantStore` connected to the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the Qdrant client cannot be created.
    pub fn new(url: &str) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    fn json_to_payload(
        payload: HashMap<String, serde_json::Value>,
    ) -> Result<HashMap<String, qdrant_client::qdrant::Value>, VectorStoreError> {
        serde_json::from_value(serde_json::Value::Object(payload.into_iter().collect()))
            .map_err(|e| VectorStoreError::Serialization(e.to_string()))
    }
}

fn value_to_json(value: qdrant_client::qdrant::Value) -> serde_json::Value {
    match value.kind {
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::Value::from(i),
        Some(Kind::DoubleValue(d)) => {
            serde_json::Number::from_f64(d).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::StructValue(s)) => serde_json::Value::Object(
            s.fields
                .into_iter()
                .map(|(k, v)| (k, value_to_json(v)))
                .collect(),
        ),
        Some(Kind::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::NullValue(_)) | None => serde_json::Value::Null,
    }
}

fn point_id_to_string(id: Option<PointId>) -> String {
    match id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Uuid(u)) => u,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

impl VectorStore for QdrantStore {
    fn ensure_collection(
        &self,
        collection: &str,
        vector_size: u64,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let exists = self
                .client
                .collection_exists(collection.as_str())
                .await
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            if exists {
                return Ok(());
            }
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(collection.as_str())
                        .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
                )
                .await
                .map_err(|e| VectorStoreError::Collection(e.to_string()))?;
            tracing::info!(%collection, vector_size, "created vector collection");
            Ok(())
        })
    }

    fn collection_exists(&self, collection: &str) -> BoxFuture<'_, Result<bool, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            self.client
                .collection_exists(collection.as_str())
                .await
                .map_err(|e| VectorStoreError::Collection(e.to_string()))
        })
    }

    fn delete_collection(&self, collection: &str) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            self.client
                .delete_collection(collection.as_str())
                .await
                .map_err(|e| VectorStoreError::Delete(e.to_string()))?;
            Ok(())
        })
    }

    fn upsert(
        &self,
        collection: &str,
        points: Vec<VectorPoint>,
    ) -> BoxFuture<'_, Result<(), VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let mut structs = Vec::with_capacity(points.len());
            for point in points {
                let payload = Self::json_to_payload(point.payload)?;
                structs.push(PointStruct::new(point.id, point.vector, payload));
            }
            self.client
                .upsert_points(UpsertPointsBuilder::new(collection.as_str(), structs))
                .await
                .map_err(|e| VectorStoreError::Upsert(e.to_string()))?;
            Ok(())
        })
    }

    fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> BoxFuture<'_, Result<Vec<ScoredVectorPoint>, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let results = self
                .client
                .search_points(
                    SearchPointsBuilder::new(collection.as_str(), vector, limit).with_payload(true),
                )
                .await
                .map_err(|e| VectorStoreError::Search(e.to_string()))?;

            Ok(results
                .result
                .into_iter()
                .map(|point| ScoredVectorPoint {
                    id: point_id_to_string(point.id),
                    score: point.score,
                    payload: point
                        .payload
                        .into_iter()
                        .map(|(k, v)| (k, value_to_json(v)))
                        .collect(),
                })
                .collect())
        })
    }

    fn point_count(&self, collection: &str) -> BoxFuture<'_, Result<u64, VectorStoreError>> {
        let collection = collection.to_owned();
        Box::pin(async move {
            let info = self
                .client
                .collection_info(collection.as_str())
                .await
                .map_err(|e| VectorStoreError::Count(e.to_string()))?;
            Ok(info.result.and_then(|i| i.points_count).unwrap_or(0))
        })
    }
}
