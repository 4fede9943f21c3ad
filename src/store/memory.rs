use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::filter::Filter;
use super::update::Update;
use super::StoreError;

/// A stored document: the store-assigned id plus the JSON body.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
}

/// An in-process document collection implementing the minimal CRUD
/// contract the service consumes: find-by-filter, insert, and
/// single-document update/delete. Each `update_one` runs under the
/// collection's write lock, so one update is atomic at document level.
#[derive(Debug, Clone)]
pub struct Collection {
    name: &'static str,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl Collection {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|doc| filter.matches(doc.id, &doc.body))
            .cloned())
    }

    /// Matching documents in insertion order (the store-natural order).
    pub async fn find_many(&self, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc.id, &doc.body))
            .cloned()
            .collect())
    }

    pub async fn insert_one(&self, body: Value) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut documents = self.documents.write().await;
        documents.push(Document { id, body });
        Ok(id)
    }

    /// Apply `update` to the first document matching `filter`. Returns
    /// whether a document was updated.
    pub async fn update_one(&self, filter: &Filter, update: &Update) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        match documents
            .iter_mut()
            .find(|doc| filter.matches(doc.id, &doc.body))
        {
            Some(doc) => {
                update.apply(&mut doc.body);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the first document matching `filter`. Returns whether a
    /// document was removed.
    pub async fn delete_one(&self, filter: &Filter) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        match documents
            .iter()
            .position(|doc| filter.matches(doc.id, &doc.body))
        {
            Some(index) => {
                documents.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
