use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use common_http_errors::ApiError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Store-native identifier, rendered as a 24 character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Parse an identifier taken from a request path.
    pub fn from_path(raw: &str, trace_id: Uuid) -> Result<Self, ApiError> {
        raw.parse().map_err(|_| ApiError::BadRequest {
            code: "invalid_id",
            trace_id: Some(trace_id),
            message: Some(format!("'{raw}' is not a valid document id")),
        })
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for DocumentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl FromStr for DocumentId {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

fn is_email(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.contains('@')
}

fn is_price(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Registration payload. `role` is deliberately absent: it is only ever set
/// through the admin promotion route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        if !is_email(&self.email) {
            return Err("email must be a non-empty address".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub recipe: String,
    pub image: String,
}

/// Body of both menu create and menu update; update replaces all five fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub recipe: String,
    #[serde(default)]
    pub image: String,
}

impl MenuItemInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if self.category.trim().is_empty() {
            return Err("category is required".into());
        }
        if !is_price(self.price) {
            return Err("price must be a non-negative number".into());
        }
        Ok(())
    }

    pub fn into_item(self, id: DocumentId) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            recipe: self.recipe,
            image: self.image,
        }
    }
}

/// Reviews are read-only, so their fields pass through untyped.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub menu_id: String,
    pub user_email: String,
    pub name: String,
    pub image: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub menu_id: String,
    pub user_email: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl NewCartItem {
    pub fn validate(&self) -> Result<(), String> {
        if !is_email(&self.user_email) {
            return Err("userEmail must be a non-empty address".into());
        }
        if self.menu_id.trim().is_empty() {
            return Err("menuId is required".into());
        }
        if !is_price(self.price) {
            return Err("price must be a non-negative number".into());
        }
        Ok(())
    }

    pub fn into_item(self, id: DocumentId) -> CartItem {
        CartItem {
            id,
            menu_id: self.menu_id,
            user_email: self.user_email,
            name: self.name,
            image: self.image,
            price: self.price,
            quantity: self.quantity,
        }
    }
}
