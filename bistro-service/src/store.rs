//! Document-store seam. Every method maps to exactly one store call.

use async_trait::async_trait;
use common_http_errors::ApiError;
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    CartItem, DocumentId, MenuItem, MenuItemInput, NewCartItem, NewUser, Review, User,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store operation failed: {0}")]
    Backend(String),
    #[error("stored document is malformed: {0}")]
    Corrupt(String),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::internal(value, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: Option<DocumentId>,
}

impl InsertOutcome {
    pub fn inserted(id: DocumentId) -> Self {
        Self { acknowledged: true, inserted_id: Some(id) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateOutcome {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    pub fn new(deleted_count: u64) -> Self {
        Self { acknowledged: true, deleted_count }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn insert_user(&self, user: NewUser) -> StoreResult<InsertOutcome>;
    async fn delete_user(&self, id: DocumentId) -> StoreResult<DeleteOutcome>;
    /// `$set` of the role field only.
    async fn set_user_role(&self, id: DocumentId, role: &str) -> StoreResult<UpdateOutcome>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>>;
    async fn find_menu_item(&self, id: DocumentId) -> StoreResult<Option<MenuItem>>;
    async fn insert_menu_item(&self, item: MenuItemInput) -> StoreResult<InsertOutcome>;
    async fn update_menu_item(&self, id: DocumentId, item: MenuItemInput) -> StoreResult<UpdateOutcome>;
    async fn delete_menu_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<InsertOutcome>;
    async fn list_cart_items(&self, user_email: &str) -> StoreResult<Vec<CartItem>>;
    async fn delete_cart_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome>;
}

/// A backend serving all four collections.
pub trait DocumentStore: UserStore + MenuStore + ReviewStore + CartStore {}

impl<T> DocumentStore for T where T: UserStore + MenuStore + ReviewStore + CartStore {}
