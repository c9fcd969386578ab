#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use estatehub::{
    build_app,
    config::{AppConfig, JwtConfig},
    error::AppError,
    properties::{
        model::{NewProperty, Owner, Property, SearchFilter},
        PropertyStore,
    },
    users::{
        model::{NewUser, User},
        UserStore,
    },
    AppState,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "Abcdef1!";

/// In-process stand-in for the Postgres stores with the same constraints:
/// unique email, owner must exist, user deletion cascades.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    properties: Mutex<Vec<Property>>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn property_count(&self) -> usize {
        self.properties.lock().unwrap().len()
    }

    fn owner(&self, id: Uuid, with_phone: bool) -> Option<Owner> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).map(|u| Owner {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
            phone_number: with_phone.then(|| u.phone_number.clone()),
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already in use".into()));
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone_number: user.phone_number,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        let removed = users.len() < before;
        if removed {
            self.properties.lock().unwrap().retain(|p| p.created_by != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn insert(&self, new: NewProperty, owner: Uuid) -> Result<Property, AppError> {
        if self.owner(owner, false).is_none() {
            return Err(AppError::Validation("Referenced user does not exist".into()));
        }
        let now = OffsetDateTime::now_utc();
        let property = Property {
            id: Uuid::new_v4(),
            images: new.images,
            title: new.title,
            location: new.location,
            description: new.description,
            property: new.property,
            kind: new.kind,
            bedroom: new.bedroom,
            area: new.area,
            price: new.price,
            negotiable: new.negotiable,
            created_by: owner,
            created_at: now,
            updated_at: now,
        };
        self.properties.lock().unwrap().push(property.clone());
        Ok(property)
    }

    async fn list(&self) -> Result<Vec<Property>, AppError> {
        Ok(self.properties.lock().unwrap().clone())
    }

    async fn find_with_owner(&self, id: Uuid) -> Result<Option<Property<Owner>>, AppError> {
        let found = self.properties.lock().unwrap().iter().find(|p| p.id == id).cloned();
        Ok(found.and_then(|p| {
            let owner = self.owner(p.created_by, true)?;
            Some(p.with_owner(owner))
        }))
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Property<Owner>>, AppError> {
        let Some(summary) = self.owner(owner, false) else {
            return Ok(Vec::new());
        };
        let owned: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.created_by == owner)
            .cloned()
            .collect();
        Ok(owned
            .into_iter()
            .map(|p| p.with_owner(summary.clone()))
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut properties = self.properties.lock().unwrap();
        let before = properties.len();
        properties.retain(|p| p.id != id);
        Ok(properties.len() < before)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Property>, AppError> {
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.matches(*p))
            .cloned()
            .collect())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "estatehub".into(),
            audience: "estatehub-users".into(),
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::from_parts(
            Arc::new(test_config()),
            store.clone() as Arc<dyn UserStore>,
            store.clone() as Arc<dyn PropertyStore>,
        );
        Self {
            router: build_app(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn register(&self, name: &str, email: &str, role: &str) -> StatusCode {
        let (status, _) = self
            .request(
                Method::POST,
                "/api/users/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "repassword": PASSWORD,
                    "phoneNumber": "555-0100",
                    "role": role,
                })),
            )
            .await;
        status
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Register and log in, returning the bearer token.
    pub async fn signup(&self, name: &str, email: &str, role: &str) -> String {
        assert_eq!(self.register(name, email, role).await, StatusCode::CREATED);
        self.login(email).await
    }

    pub async fn create_property(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/api/properties/Properties", Some(token), Some(body))
            .await
    }
}

pub fn listing(location: &str, kind: &str, property: &str, bedroom: i32, price: f64) -> Value {
    json!({
        "images": ["https://img.example/1.jpg"],
        "title": format!("{property} in {location}"),
        "location": location,
        "description": "Bright and quiet",
        "property": property,
        "type": kind,
        "bedroom": bedroom,
        "area": 72.5,
        "price": price,
    })
}
