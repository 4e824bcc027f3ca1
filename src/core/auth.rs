use crate::domain::model::DeveloperSummary;
use crate::domain::ports::AccountApi;

/// 外部認證服務的 session 生命週期
///
/// `Uninitialized → Loading → Authenticated | Anonymous → (logout) → Anonymous`
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(Box<DeveloperSummary>),
    Anonymous,
}

#[derive(Debug, Default)]
pub struct AuthContext {
    phase: AuthPhase,
    error: Option<String>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 搜尋只需要知道 session 是否已經確定，不關心細節
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated(_) | AuthPhase::Anonymous)
    }

    pub fn user(&self) -> Option<&DeveloperSummary> {
        match &self.phase {
            AuthPhase::Authenticated(user) => Some(user.as_ref()),
            _ => None,
        }
    }

    /// 先交換 CSRF token，再以 `GET /api/user` 判斷登入狀態
    pub async fn check<A: AccountApi + ?Sized>(&mut self, api: &A) -> &AuthPhase {
        self.phase = AuthPhase::Loading;
        self.error = None;

        if let Err(e) = api.csrf_token().await {
            tracing::warn!("⚠️ CSRF token exchange failed: {}", e);
        }

        match api.current_user().await {
            Ok(user) => {
                tracing::info!("👤 Session authenticated as {}", user.username);
                self.phase = AuthPhase::Authenticated(Box::new(user));
            }
            Err(e) if e.is_unauthenticated() => {
                tracing::debug!("Session is anonymous");
                self.phase = AuthPhase::Anonymous;
            }
            Err(e) => {
                tracing::warn!("⚠️ Session check failed: {}", e);
                self.error = Some(e.user_friendly_message());
                self.phase = AuthPhase::Anonymous;
            }
        }
        &self.phase
    }

    pub fn logout(&mut self) {
        self.phase = AuthPhase::Anonymous;
        self.error = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
