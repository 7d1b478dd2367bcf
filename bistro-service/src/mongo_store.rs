use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::models::{
    CartItem, DocumentId, MenuItem, MenuItemInput, NewCartItem, NewUser, Review, User,
};
use crate::store::{
    CartStore, DeleteOutcome, InsertOutcome, MenuStore, ReviewStore, StoreError, StoreResult,
    UpdateOutcome, UserStore,
};

const USERS: &str = "users";
const MENU: &str = "menu";
const REVIEWS: &str = "review";
const CARTS: &str = "carts";

impl From<mongodb::error::Error> for StoreError {
    fn from(value: mongodb::error::Error) -> Self {
        StoreError::Backend(value.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_url: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

/// Non-string values (numbers, arrays, null) read as absent.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Bson>::deserialize(deserializer)? {
        Some(Bson::String(value)) => Some(value),
        _ => None,
    })
}

impl From<UserDocument> for User {
    fn from(value: UserDocument) -> Self {
        Self {
            id: value.id.into(),
            email: value.email,
            name: value.name,
            photo_url: value.photo_url,
            role: value.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MenuDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    category: String,
    price: f64,
    #[serde(default)]
    recipe: String,
    #[serde(default)]
    image: String,
}

impl From<MenuDocument> for MenuItem {
    fn from(value: MenuDocument) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            category: value.category,
            price: value.price,
            recipe: value.recipe,
            image: value.image,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    menu_id: String,
    user_email: String,
    name: String,
    #[serde(default)]
    image: String,
    price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
}

impl From<CartDocument> for CartItem {
    fn from(value: CartDocument) -> Self {
        Self {
            id: value.id.into(),
            menu_id: value.menu_id,
            user_email: value.user_email,
            name: value.name,
            image: value.image,
            price: value.price,
            quantity: value.quantity,
        }
    }
}

fn review_from_document(mut document: Document) -> StoreResult<Review> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => DocumentId::from(oid),
        other => {
            return Err(StoreError::Corrupt(format!(
                "review _id is not an ObjectId: {other:?}"
            )))
        }
    };
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(fields) => Ok(Review { id, fields }),
        other => Err(StoreError::Corrupt(format!("review is not an object: {other}"))),
    }
}

fn by_id(id: DocumentId) -> Document {
    doc! { "_id": id.object_id() }
}

/// MongoDB-backed collections sharing one client for the process lifetime.
pub struct MongoStore {
    client: Client,
    users: Collection<UserDocument>,
    menu: Collection<MenuDocument>,
    reviews: Collection<Document>,
    carts: Collection<CartDocument>,
}

impl MongoStore {
    /// Build a client pinned to Stable API v1 (strict, deprecation errors on).
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        options.app_name = Some("bistro-service".to_string());
        let client = Client::with_options(options)?;
        Ok(Self::from_client(client, database))
    }

    pub fn from_client(client: Client, database: &str) -> Self {
        let db: Database = client.database(database);
        Self {
            users: db.collection(USERS),
            menu: db.collection(MENU),
            reviews: db.collection(REVIEWS),
            carts: db.collection(CARTS),
            client,
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let found = self.users.find_one(doc! { "email": email }, None).await?;
        Ok(found.map(User::from))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let docs: Vec<UserDocument> = self.users.find(None, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(User::from).collect())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<InsertOutcome> {
        let id = ObjectId::new();
        let document = UserDocument {
            id,
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            role: None,
        };
        self.users.insert_one(&document, None).await?;
        debug!(%id, "inserted user");
        Ok(InsertOutcome::inserted(id.into()))
    }

    async fn delete_user(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        let result = self.users.delete_one(by_id(id), None).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }

    async fn set_user_role(&self, id: DocumentId, role: &str) -> StoreResult<UpdateOutcome> {
        let result = self
            .users
            .update_one(by_id(id), doc! { "$set": { "role": role } }, None)
            .await?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }
}

#[async_trait]
impl MenuStore for MongoStore {
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        let docs: Vec<MenuDocument> = self.menu.find(None, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(MenuItem::from).collect())
    }

    async fn find_menu_item(&self, id: DocumentId) -> StoreResult<Option<MenuItem>> {
        let found = self.menu.find_one(by_id(id), None).await?;
        Ok(found.map(MenuItem::from))
    }

    async fn insert_menu_item(&self, item: MenuItemInput) -> StoreResult<InsertOutcome> {
        let id = ObjectId::new();
        let document = MenuDocument {
            id,
            name: item.name,
            category: item.category,
            price: item.price,
            recipe: item.recipe,
            image: item.image,
        };
        self.menu.insert_one(&document, None).await?;
        Ok(InsertOutcome::inserted(id.into()))
    }

    async fn update_menu_item(&self, id: DocumentId, item: MenuItemInput) -> StoreResult<UpdateOutcome> {
        let update = doc! {
            "$set": {
                "name": item.name,
                "category": item.category,
                "price": item.price,
                "recipe": item.recipe,
                "image": item.image,
            }
        };
        let result = self.menu.update_one(by_id(id), update, None).await?;
        Ok(UpdateOutcome::new(result.matched_count, result.modified_count))
    }

    async fn delete_menu_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        let result = self.menu.delete_one(by_id(id), None).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }
}

#[async_trait]
impl ReviewStore for MongoStore {
    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let docs: Vec<Document> = self.reviews.find(None, None).await?.try_collect().await?;
        docs.into_iter().map(review_from_document).collect()
    }
}

#[async_trait]
impl CartStore for MongoStore {
    async fn insert_cart_item(&self, item: NewCartItem) -> StoreResult<InsertOutcome> {
        let id = ObjectId::new();
        let document = CartDocument {
            id,
            menu_id: item.menu_id,
            user_email: item.user_email,
            name: item.name,
            image: item.image,
            price: item.price,
            quantity: item.quantity,
        };
        self.carts.insert_one(&document, None).await?;
        Ok(InsertOutcome::inserted(id.into()))
    }

    async fn list_cart_items(&self, user_email: &str) -> StoreResult<Vec<CartItem>> {
        let docs: Vec<CartDocument> = self
            .carts
            .find(doc! { "userEmail": user_email }, None)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(CartItem::from).collect())
    }

    async fn delete_cart_item(&self, id: DocumentId) -> StoreResult<DeleteOutcome> {
        let result = self.carts.delete_one(by_id(id), None).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_fields_pass_through_as_json() {
        let oid = ObjectId::new();
        let review = review_from_document(doc! {
            "_id": oid,
            "name": "Ada",
            "details": "Great soup",
            "rating": 4.5,
        })
        .expect("review");
        assert_eq!(review.id, DocumentId::from(oid));
        assert_eq!(review.fields["name"], "Ada");
        assert_eq!(review.fields["rating"], 4.5);
        assert!(!review.fields.contains_key("_id"));
    }

    #[test]
    fn non_string_role_reads_as_no_role() {
        let oid = ObjectId::new();
        let user: User = bson::from_document::<UserDocument>(doc! {
            "_id": oid,
            "email": "a@x.com",
            "role": 5,
        })
        .expect("user document")
        .into();
        assert_eq!(user.role, None);
        assert!(!common_auth::is_admin(user.role.as_deref()));

        let admin: UserDocument =
            bson::from_document(doc! { "_id": oid, "email": "b@x.com", "role": "admin" })
                .expect("admin document");
        assert_eq!(admin.role.as_deref(), Some("admin"));
    }

    #[test]
    fn review_with_foreign_id_is_corrupt() {
        let err = review_from_document(doc! { "_id": "plain-string", "name": "x" })
            .expect_err("non ObjectId id");
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
