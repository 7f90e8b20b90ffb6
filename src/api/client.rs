use reqwest::{Method, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;

use crate::api::error::{ApiError, normalize_detail};
use crate::common::types::{
    ChatMessage, Connection, IncomingRequest, Interests, NewSkill, NotificationPrefs,
    PrivacySettings, Profile, ProfileUpdate, SentRequest, Skill, StoredNotification, Summary,
};

/// Thin REST wrapper: bearer auth, JSON decode, error normalization.
/// One method per backend endpoint, mirroring the server's route table.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

/// Response of `/login` and `/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(serde::Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
struct SignupBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
struct ExchangeBody<'a> {
    skill_id: &'a str,
    message: &'a str,
}

#[derive(serde::Serialize)]
struct RespondBody<'a> {
    action: &'a str,
}

#[derive(serde::Serialize)]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            token,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: bool,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if auth {
            let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: normalize_detail(status.as_u16(), &body),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(T::default());
        }
        Ok(resp.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None, true).await
    }

    // ── Auth ────────────────────────────────────────────────────

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginBody { username, password };
        let resp: RawAuthResponse = self
            .request(Method::POST, "/login", Some(&body), false)
            .await?;
        resp.into_auth()
    }

    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = SignupBody {
            username,
            email,
            password,
        };
        let resp: RawAuthResponse = self
            .request(Method::POST, "/signup", Some(&body), false)
            .await?;
        resp.into_auth()
    }

    // ── Dashboard & skills ──────────────────────────────────────

    pub async fn summary(&self) -> Result<Summary, ApiError> {
        self.request::<(), RawSummary>(Method::GET, "/dashboard/summary", None, true)
            .await
            .map(|raw| raw.0)
    }

    pub async fn market_skills(&self) -> Result<Vec<Skill>, ApiError> {
        self.get("/skills/market").await
    }

    pub async fn my_skills(&self) -> Result<Vec<Skill>, ApiError> {
        self.get("/skills/mine").await
    }

    /// The description is truncated to the backend's cap before submission.
    pub async fn add_skill(&self, skill: NewSkill) -> Result<MessageResponse, ApiError> {
        let skill = skill.sanitized();
        self.request(Method::POST, "/skills", Some(&skill), true)
            .await
    }

    pub async fn delete_skill(&self, skill_id: &str) -> Result<MessageResponse, ApiError> {
        self.request::<(), _>(Method::DELETE, &format!("/skills/{skill_id}"), None, true)
            .await
    }

    // ── Exchange requests ───────────────────────────────────────

    pub async fn request_exchange(
        &self,
        skill_id: &str,
        message: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = ExchangeBody { skill_id, message };
        self.request(Method::POST, "/requests", Some(&body), true)
            .await
    }

    pub async fn respond_to_request(
        &self,
        request_id: &str,
        action: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = RespondBody { action };
        self.request(
            Method::PUT,
            &format!("/requests/{request_id}/respond"),
            Some(&body),
            true,
        )
        .await
    }

    pub async fn sent_requests(&self) -> Result<Vec<SentRequest>, ApiError> {
        self.get("/requests/sent").await
    }

    pub async fn incoming_requests(&self) -> Result<Vec<IncomingRequest>, ApiError> {
        self.get("/requests/incoming").await
    }

    // ── Notifications ───────────────────────────────────────────

    pub async fn notifications(&self) -> Result<Vec<StoredNotification>, ApiError> {
        self.get("/notifications").await
    }

    pub async fn mark_notification_read(
        &self,
        notification_id: &str,
    ) -> Result<MessageResponse, ApiError> {
        self.request::<(), _>(
            Method::PUT,
            &format!("/notifications/{notification_id}/read"),
            None,
            true,
        )
        .await
    }

    // ── Chat ────────────────────────────────────────────────────

    pub async fn chat_history(&self, request_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        self.get(&format!("/chat/{request_id}")).await
    }

    pub async fn chat_connections(&self) -> Result<Vec<Connection>, ApiError> {
        self.get("/chats/connections").await
    }

    // ── Profile & settings ──────────────────────────────────────

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        self.get("/profile").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<MessageResponse, ApiError> {
        self.request(Method::PUT, "/profile", Some(update), true)
            .await
    }

    pub async fn upload_profile_picture(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> Result<MessageResponse, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::MissingToken)?;
        let part = multipart::Part::bytes(bytes).file_name(filename);
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(format!("{}/profile/picture", self.base_url))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: normalize_detail(status.as_u16(), &body),
            });
        }
        Ok(resp.json().await?)
    }

    pub async fn save_interests(
        &self,
        interests: &Interests,
    ) -> Result<MessageResponse, ApiError> {
        self.request(Method::PUT, "/profile/interests", Some(interests), true)
            .await
    }

    pub async fn save_privacy(
        &self,
        settings: &PrivacySettings,
    ) -> Result<MessageResponse, ApiError> {
        self.request(Method::PUT, "/profile/privacy", Some(settings), true)
            .await
    }

    pub async fn save_notification_prefs(
        &self,
        prefs: &NotificationPrefs,
    ) -> Result<MessageResponse, ApiError> {
        self.request(Method::PUT, "/profile/notifications", Some(prefs), true)
            .await
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = ChangePasswordBody {
            current_password: current,
            new_password: new,
        };
        self.request(Method::POST, "/account/change-password", Some(&body), true)
            .await
    }
}

/// Wire shape of the auth endpoints; `access_token` may be absent on error
/// bodies that still come back 2xx from older server builds.
#[derive(Debug, Default, Deserialize)]
struct RawAuthResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    message: String,
}

impl RawAuthResponse {
    fn into_auth(self) -> Result<AuthResponse, ApiError> {
        let Some(access_token) = self.access_token.filter(|t| !t.is_empty()) else {
            return Err(ApiError::Status {
                status: 200,
                message: "Server did not return an access token".to_string(),
            });
        };
        Ok(AuthResponse {
            access_token,
            username: self.username,
            email: self.email,
            message: self.message,
        })
    }
}

// Summary has no Default; wrap it so the shared request helper can be reused.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct RawSummary(Summary);

impl Default for RawSummary {
    fn default() -> Self {
        RawSummary(Summary {
            username: String::new(),
            totals: Default::default(),
            last_active_skill: None,
            ai_suggestion: String::new(),
        })
    }
}

impl Default for MessageResponse {
    fn default() -> Self {
        MessageResponse {
            message: String::new(),
        }
    }
}
