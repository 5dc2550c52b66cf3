#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenCodec;
use auth_service::domain::identity::errors::DirectoryError;
use auth_service::domain::identity::errors::StoreError;
use auth_service::domain::identity::models::NewUser;
use auth_service::domain::identity::models::User;
use auth_service::domain::identity::models::UserId;
use auth_service::domain::identity::models::Username;
use auth_service::domain::identity::ports::RefreshTokenStore;
use auth_service::domain::identity::ports::UserDirectory;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::http::router::create_router;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// User directory kept in process memory; ids are assigned sequentially from 1
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, User>>,
    next_id: AtomicI64,
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create_user(&self, user: NewUser) -> Result<UserId, DirectoryError> {
        let mut users = self.users.lock().unwrap();

        if users.contains_key(user.username.as_str()) {
            return Err(DirectoryError::DuplicateUsername(
                user.username.as_str().to_string(),
            ));
        }

        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        users.insert(
            user.username.as_str().to_string(),
            User {
                id,
                username: user.username,
                password_hash: user.password_hash,
                created_at: user.created_at,
            },
        );

        Ok(id)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }
}

/// Refresh token store kept in process memory, with a switch to simulate outages
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: Mutex<HashMap<UserId, String>>,
    failing: AtomicBool,
    reads: AtomicI64,
}

impl InMemoryRefreshTokenStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self, user_id: UserId) -> Option<String> {
        self.tokens.lock().unwrap().get(&user_id).cloned()
    }

    pub fn reads(&self) -> i64 {
        self.reads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Failure("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn upsert(&self, user_id: UserId, token: &str) -> Result<(), StoreError> {
        self.check()?;
        self.tokens
            .lock()
            .unwrap()
            .insert(user_id, token.to_string());
        Ok(())
    }

    async fn get(&self, user_id: UserId) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.stored(user_id))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        self.check()?;
        self.tokens.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

pub type TestAuthService = AuthService<InMemoryUserDirectory, InMemoryRefreshTokenStore>;

/// Auth service wired to in-memory collaborators
pub struct TestContext {
    pub service: Arc<TestAuthService>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub token_store: Arc<InMemoryRefreshTokenStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_codec(TokenCodec::new(TEST_SECRET).expect("valid secret"))
    }

    pub fn with_codec(token_codec: TokenCodec) -> Self {
        let directory = Arc::new(InMemoryUserDirectory::default());
        let token_store = Arc::new(InMemoryRefreshTokenStore::default());

        let service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::clone(&token_store),
            cheap_hasher(),
            token_codec,
        ));

        Self {
            service,
            directory,
            token_store,
        }
    }
}

pub fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid cost")
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub context: TestContext,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let context = TestContext::new();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(context.service.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            context,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}
