//! Qdrant-backed vector index

use async_trait::async_trait;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config;
use qdrant_client::qdrant::{
    CollectionExistsRequest, CollectionInfo, CreateCollectionBuilder, DeleteCollectionBuilder,
    Distance, GetCollectionInfoRequest, GetPointsBuilder, PointId, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;

use lrag_core::{Document, Error, Result};

use crate::config::StoreConfig;
use crate::vector::{IndexHit, VectorIndex};

const TEXT_FIELD: &str = "text";

/// [`VectorIndex`] over a Qdrant collection using cosine distance
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    /// Connect to Qdrant and prepare the collection.
    ///
    /// Any failure here is reported as [`Error::Construction`]; once this
    /// returns the index is assumed reachable for the life of the process.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let client = Qdrant::from_url(&config.qdrant_url)
            .timeout(config.connect_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;

        client
            .health_check()
            .await
            .map_err(|e| Error::Construction(format!("{} unreachable: {}", config.qdrant_url, e)))?;

        let index = Self {
            client,
            collection: config.collection.clone(),
        };
        index
            .prepare_collection(config.dimension, config.recreate_collection)
            .await
            .map_err(|e| match e {
                Error::Construction(_) => e,
                other => Error::Construction(other.to_string()),
            })?;

        Ok(index)
    }

    async fn prepare_collection(&self, dimension: usize, recreate: bool) -> Result<()> {
        let exists = self
            .client
            .collection_exists(CollectionExistsRequest {
                collection_name: self.collection.clone(),
            })
            .await
            .map_err(store_error)?;

        if exists && !recreate {
            let info = self
                .client
                .collection_info(GetCollectionInfoRequest {
                    collection_name: self.collection.clone(),
                })
                .await
                .map_err(store_error)?;
            return check_vector_size(&self.collection, info.result.as_ref(), dimension);
        }

        if exists {
            self.client
                .delete_collection(DeleteCollectionBuilder::new(self.collection.clone()))
                .await
                .map_err(store_error)?;
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
                    VectorParamsBuilder::new(dimension as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(store_error)?;
        tracing::info!(collection = %self.collection, dimension, "created Qdrant collection");

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn contains(&self, id: &str) -> Result<bool> {
        let ids: Vec<PointId> = vec![id.to_string().into()];
        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(self.collection.clone(), ids)
                    .with_payload(false)
                    .with_vectors(false),
            )
            .await
            .map_err(store_error)?;

        Ok(!response.result.is_empty())
    }

    async fn upsert(&self, document: &Document) -> Result<()> {
        let payload = Payload::try_from(json!({ TEXT_FIELD: document.text }))
            .map_err(store_error)?;
        let point = PointStruct::new(document.id.clone(), document.vector.clone(), payload);

        self.client
            .upsert_points(
                UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true),
            )
            .await
            .map_err(store_error)?;

        Ok(())
    }

    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<IndexHit>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(self.collection.clone(), vector.to_vec(), limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(store_error)?;

        Ok(response.result.into_iter().filter_map(into_hit).collect())
    }
}

/// Qdrant reports cosine similarity as the score; convert it to a distance.
fn into_hit(point: ScoredPoint) -> Option<IndexHit> {
    match point.payload.get(TEXT_FIELD) {
        Some(Value {
            kind: Some(Kind::StringValue(text)),
        }) => Some(IndexHit {
            text: text.clone(),
            distance: 1.0 - point.score,
        }),
        _ => None,
    }
}

/// A kept collection must hold a single unnamed vector of length `dimension`.
fn check_vector_size(
    collection: &str,
    info: Option<&CollectionInfo>,
    dimension: usize,
) -> Result<()> {
    let vectors = info
        .and_then(|info| info.config.as_ref())
        .and_then(|config| config.params.as_ref())
        .and_then(|params| params.vectors_config.as_ref())
        .and_then(|vectors| vectors.config.as_ref());

    match vectors {
        Some(Config::Params(params)) if params.size == dimension as u64 => Ok(()),
        Some(Config::Params(params)) => Err(Error::Construction(format!(
            "collection {} has vector size {}, expected {}",
            collection, params.size, dimension
        ))),
        _ => Err(Error::Construction(format!(
            "collection {} has no single vector configuration",
            collection
        ))),
    }
}

fn store_error(err: qdrant_client::QdrantError) -> Error {
    Error::Store(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::{CollectionConfig, CollectionParams, VectorParams, VectorsConfig};
    use std::collections::HashMap;

    fn scored(payload: HashMap<String, Value>, score: f32) -> ScoredPoint {
        ScoredPoint {
            payload,
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_hit_from_payload() {
        let mut payload = HashMap::new();
        payload.insert(TEXT_FIELD.to_string(), Value::from("stored text".to_string()));

        let hit = into_hit(scored(payload, 0.75)).unwrap();
        assert_eq!(hit.text, "stored text");
        assert!((hit.distance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_hit_without_text_is_skipped() {
        let mut payload = HashMap::new();
        payload.insert("other".to_string(), Value::from("x".to_string()));

        assert!(into_hit(scored(payload, 0.9)).is_none());
        assert!(into_hit(scored(HashMap::new(), 0.9)).is_none());
    }

    fn collection_with_size(size: u64) -> CollectionInfo {
        CollectionInfo {
            config: Some(CollectionConfig {
                params: Some(CollectionParams {
                    vectors_config: Some(VectorsConfig {
                        config: Some(Config::Params(VectorParams {
                            size,
                            distance: Distance::Cosine.into(),
                            ..Default::default()
                        })),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_kept_collection_vector_size() {
        assert!(check_vector_size("docs", Some(&collection_with_size(128)), 128).is_ok());

        let err = check_vector_size("docs", Some(&collection_with_size(64)), 128).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
        assert_eq!(
            err.to_string(),
            "Store construction failed: collection docs has vector size 64, expected 128"
        );

        let err = check_vector_size("docs", None, 128).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_construction_failure() {
        let config = StoreConfig::new("http://127.0.0.1:1").with_connect_timeout(1);

        let err = QdrantIndex::connect(&config).await.err().unwrap();
        assert!(matches!(err, Error::Construction(_)));
    }
}
