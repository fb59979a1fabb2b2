use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use futures::future::{Ready, ready};
use uuid::Uuid;

use crate::services::auth_services::AuthService;

/// Extractor for routes that require a logged-in user. Anything short of a
/// valid bearer token counts as anonymous and redirects to the login page
/// with the original target preserved in `next`.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(auth) = req.app_data::<web::Data<AuthService>>() else {
            return ready(Err(login_redirect(req)));
        };

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim);

        let Some(token) = token else {
            return ready(Err(login_redirect(req)));
        };

        match auth.decode_token(token) {
            Ok((user_id, username)) => ready(Ok(AuthenticatedUser { user_id, username })),
            Err(e) => {
                log::debug!("rejected bearer token: {}", e);
                ready(Err(login_redirect(req)))
            }
        }
    }
}

fn login_redirect(req: &HttpRequest) -> Error {
    let next = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!("/auth/login/?next={}", urlencoding::encode(next));
    let response = HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish();
    InternalError::from_response("login required", response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use chrono::Utc;

    use crate::models::user::User;

    fn auth_data() -> web::Data<AuthService> {
        web::Data::new(AuthService::new("test-secret", 3600))
    }

    async fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
        AuthenticatedUser::from_request(req, &mut Payload::None).await
    }

    #[actix_web::test]
    async fn anonymous_request_redirects_to_login_with_next() {
        let req = TestRequest::with_uri("/create/")
            .app_data(auth_data())
            .to_http_request();
        let err = extract(&req).await.err().unwrap();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/auth/login/?next=%2Fcreate%2F");
    }

    #[actix_web::test]
    async fn next_keeps_the_query_string() {
        let req = TestRequest::with_uri("/posts/7/edit/?draft=1")
            .app_data(auth_data())
            .to_http_request();
        let err = extract(&req).await.err().unwrap();
        let resp = err.error_response();
        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/auth/login/?next=%2Fposts%2F7%2Fedit%2F%3Fdraft%3D1");
    }

    #[actix_web::test]
    async fn invalid_token_is_treated_as_anonymous() {
        let req = TestRequest::with_uri("/follow/")
            .app_data(auth_data())
            .insert_header((header::AUTHORIZATION, "Bearer not.a.token"))
            .to_http_request();
        let err = extract(&req).await.err().unwrap();
        assert_eq!(err.error_response().status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn valid_token_yields_the_user() {
        let auth = AuthService::new("test-secret", 3600);
        let user = User {
            id: Uuid::new_v4(),
            username: "leo".into(),
            email: "leo@example.com".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        let token = auth.issue_token(&user).unwrap();
        let req = TestRequest::with_uri("/create/")
            .app_data(web::Data::new(auth))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();
        let authed = extract(&req).await.unwrap();
        assert_eq!(authed.user_id, user.id);
        assert_eq!(authed.username, "leo");
    }
}
