use axum::Json;
use common_auth::AuthContext;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user_id: String,
    pub tenant_id: String,
}

/// `GET /v1/tenants/:tenant_id/whoami`; runs behind the tenant-scoped chain.
pub async fn tenant_whoami(auth: AuthContext) -> Json<WhoAmI> {
    Json(WhoAmI {
        user_id: auth.subject().to_string(),
        tenant_id: auth.tenant_id().to_string(),
    })
}
