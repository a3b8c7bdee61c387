use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::{Router, routing::get};

use super::handlers;
use super::handlers::auth::{login, logout, register};
use super::handlers::probes::{healthz, livez};
use super::middlewares::authn;
use super::state::AppState;
use crate::prelude::Result;

// CV uploads top out at 10 MiB; the body cap leaves headroom for the
// rest of the multipart payload.
const BODY_LIMIT: usize = 32 * 1024 * 1024;

pub async fn build_routes() -> Result<Router> {
    Ok(routes(AppState::new().await?))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/logout", get(logout))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route(
            "/profile",
            get(handlers::profiles::show).post(handlers::profiles::update),
        )
        .route(
            "/company/profile",
            get(handlers::profiles::company_show).post(handlers::profiles::company_update),
        )
        .route("/company/add-job", post(handlers::jobs::add_job))
        .route("/company/job/{id}/edit", post(handlers::jobs::edit_job))
        .route("/company/job/{id}/close", post(handlers::jobs::close_job))
        .route("/company/job/{id}/open", post(handlers::jobs::open_job))
        .route("/company/job/{id}/delete", post(handlers::jobs::delete_job))
        .route("/apply/{id}", post(handlers::applications::apply))
        .route("/company/applications", get(handlers::applications::list))
        .route(
            "/company/application/{id}",
            get(handlers::applications::view),
        )
        .route(
            "/company/application/{id}/accept",
            post(handlers::applications::accept),
        )
        .route(
            "/company/application/{id}/reject",
            post(handlers::applications::reject),
        )
        .route("/notifications", get(handlers::notifications::list))
        .route(
            "/notifications/{id}/read",
            post(handlers::notifications::mark_read),
        )
        .route(
            "/notifications/read-all",
            post(handlers::notifications::mark_all_read),
        )
        .route("/notifications/clear", post(handlers::notifications::clear))
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route("/admin/activity", get(handlers::admin::activity))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/", get(handlers::jobs::index))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/job/{id}", get(handlers::jobs::detail))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::routes;
    use crate::pkg::server::state::test_state;
    use crate::prelude::Result;

    async fn test_router() -> Result<Router> {
        Ok(routes(test_state().await?))
    }

    fn form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn register_and_login(app: &Router, body: &str, email: &str) -> String {
        let response = app.clone().oneshot(form("/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(form(
                "/login",
                &format!("email={email}&password=secret123"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login sets the session cookie")
            .to_str()
            .unwrap();
        cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_login_and_dashboard() -> Result<()> {
        let app = test_router().await?;
        let cookie = register_and_login(
            &app,
            "name=Ana+Jones&email=ana@example.com&password=secret123\
             &confirm_password=secret123&role=applicant",
            "ana@example.com",
        )
        .await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() -> Result<()> {
        let app = test_router().await?;
        let body = "name=Ana+Jones&email=ana@example.com&password=secret123\
                    &confirm_password=secret123&role=applicant";
        let response = app.clone().oneshot(form("/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(form("/register", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .clone()
            .oneshot(form(
                "/register",
                "name=Ana+Jones&email=ana@example.com&password=secret123\
                 &confirm_password=secret123&role=applicant",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(form("/login", "email=ana@example.com&password=nope66"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_job_detail_is_404() -> Result<()> {
        let app = test_router().await?;
        let response = app
            .oneshot(Request::builder().uri("/job/999").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_post_job_and_apply_flow() -> Result<()> {
        let app = test_router().await?;
        let company_cookie = register_and_login(
            &app,
            "name=Acme+HR&email=hr@acme.example&password=secret123\
             &confirm_password=secret123&role=company&company_name=Acme",
            "hr@acme.example",
        )
        .await;

        let mut post_job = form(
            "/company/add-job",
            "title=Backend+Engineer&location=Remote&description=Build+services\
             &qualifications=Rust&slots=2",
        );
        post_job
            .headers_mut()
            .insert(header::COOKIE, company_cookie.parse().unwrap());
        let response = app.clone().oneshot(post_job).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let applicant_cookie = register_and_login(
            &app,
            "name=Ana+Jones&email=ana@example.com&password=secret123\
             &confirm_password=secret123&role=applicant",
            "ana@example.com",
        )
        .await;

        let boundary = "routerapply";
        let letter = "I have been building backend services in production for six years \
                      and would like to bring that experience to this role at Acme.";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"cover_letter\"\r\n\r\n\
             {letter}\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/apply/1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .header(header::COOKIE, &applicant_cookie)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/company/applications")
                    .header(header::COOKIE, &company_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["applicant_name"], "Ana Jones");
        let application_id = listed[0]["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/company/application/{application_id}/accept"))
                    .header(header::COOKIE, &company_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications")
                    .header(header::COOKIE, &applicant_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let inbox: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(inbox["unread"].as_i64().unwrap() >= 1);
        assert!(
            inbox["notifications"]
                .as_array()
                .unwrap()
                .iter()
                .any(|n| n["kind"] == "application_status")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_cv_replace_removes_old_file() -> Result<()> {
        let app = test_router().await?;
        let cookie = register_and_login(
            &app,
            "name=Ana+Jones&email=ana@example.com&password=secret123\
             &confirm_password=secret123&role=applicant",
            "ana@example.com",
        )
        .await;

        let boundary = "cvreplace";
        let update_profile = |content: &str| {
            let body = format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"full_name\"\r\n\r\n\
                 Ana Jones\r\n\
                 --{boundary}\r\n\
                 Content-Disposition: form-data; name=\"skills\"\r\n\r\n\
                 rust, sql\r\n\
                 --{boundary}\r\n\
                 Content-Disposition: form-data; name=\"cv\"; filename=\"resume.pdf\"\r\n\
                 Content-Type: application/pdf\r\n\r\n\
                 {content}\r\n\
                 --{boundary}--\r\n"
            );
            Request::builder()
                .method("POST")
                .uri("/profile")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .header(header::COOKIE, &cookie)
                .body(Body::from(body))
                .unwrap()
        };

        let mut paths = Vec::new();
        for content in ["first cv", "second cv"] {
            let response = app.clone().oneshot(update_profile(content)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let profile: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            paths.push(profile["cv_path"].as_str().unwrap().to_string());
        }
        assert_ne!(paths[0], paths[1]);

        let dir = std::path::Path::new(&crate::conf::settings.upload_dir);
        assert!(!dir.join(&paths[0]).exists());
        assert!(dir.join(&paths[1]).exists());
        tokio::fs::remove_file(dir.join(&paths[1])).await.ok();
        Ok(())
    }

    #[tokio::test]
    async fn test_open_listing_delete_guard_and_removal_notice() -> Result<()> {
        let app = test_router().await?;
        let company_cookie = register_and_login(
            &app,
            "name=Acme+HR&email=hr@acme.example&password=secret123\
             &confirm_password=secret123&role=company&company_name=Acme",
            "hr@acme.example",
        )
        .await;
        let mut post_job = form(
            "/company/add-job",
            "title=Backend+Engineer&location=Remote&description=Build+services\
             &qualifications=Rust&slots=2",
        );
        post_job
            .headers_mut()
            .insert(header::COOKIE, company_cookie.parse().unwrap());
        assert_eq!(
            app.clone().oneshot(post_job).await.unwrap().status(),
            StatusCode::CREATED
        );

        let applicant_cookie = register_and_login(
            &app,
            "name=Ana+Jones&email=ana@example.com&password=secret123\
             &confirm_password=secret123&role=applicant",
            "ana@example.com",
        )
        .await;
        let boundary = "deleteflow";
        let letter = "I have been building backend services in production for six years \
                      and would like to bring that experience to this role at Acme.";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"cover_letter\"\r\n\r\n\
             {letter}\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/apply/1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .header(header::COOKIE, &applicant_cookie)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Still open (one of two slots taken): delete is refused.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/company/job/1/delete")
                    .header(header::COOKIE, &company_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // The listing and its application survive the refused delete.
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/job/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/company/applications")
                    .header(header::COOKIE, &company_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        for uri in ["/company/job/1/close", "/company/job/1/delete"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .header(header::COOKIE, &company_cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications")
                    .header(header::COOKIE, &applicant_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let inbox: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            inbox["notifications"]
                .as_array()
                .unwrap()
                .iter()
                .any(|n| n["kind"] == "job_removed")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_cv_writes_no_application() -> Result<()> {
        let app = test_router().await?;
        let company_cookie = register_and_login(
            &app,
            "name=Acme+HR&email=hr@acme.example&password=secret123\
             &confirm_password=secret123&role=company&company_name=Acme",
            "hr@acme.example",
        )
        .await;
        let mut post_job = form(
            "/company/add-job",
            "title=Backend+Engineer&location=Remote&description=Build+services\
             &qualifications=Rust&slots=2",
        );
        post_job
            .headers_mut()
            .insert(header::COOKIE, company_cookie.parse().unwrap());
        assert_eq!(
            app.clone().oneshot(post_job).await.unwrap().status(),
            StatusCode::CREATED
        );

        let applicant_cookie = register_and_login(
            &app,
            "name=Ana+Jones&email=ana@example.com&password=secret123\
             &confirm_password=secret123&role=applicant",
            "ana@example.com",
        )
        .await;

        let boundary = "badupload";
        let letter = "I have been building backend services in production for six years \
                      and would like to bring that experience to this role at Acme.";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"cover_letter\"\r\n\r\n\
             {letter}\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"cv\"; filename=\"resume.docx\"\r\n\
             Content-Type: application/msword\r\n\r\n\
             not a pdf\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/apply/1")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .header(header::COOKIE, &applicant_cookie)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/company/applications")
                    .header(header::COOKIE, &company_cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(listed.as_array().unwrap().is_empty());
        Ok(())
    }
}
