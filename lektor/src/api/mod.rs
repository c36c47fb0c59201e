pub mod dto;
pub mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::{create_router, AppState};
    use crate::chat::ChatClient;
    use crate::config::{ChatConfig, Config, OcrConfig, ServerConfig, TtsConfig};
    use crate::ocr::TesseractEngine;
    use crate::tts::TtsClient;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            chat: ChatConfig {
                model: "gpt-4o-mini".to_string(),
                api_key: Some("test-key".to_string()),
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            tts: TtsConfig {
                model: "tts-1".to_string(),
                voice: "alloy".to_string(),
                format: "mp3".to_string(),
                api_key: Some("test-key".to_string()),
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            ocr: OcrConfig {
                command: "/nonexistent/tesseract".to_string(),
                languages: "eng+pol".to_string(),
                psms: vec![7, 6, 11, 3],
                upscale_threshold: 2000,
                contrast_factor: 1.5,
            },
        }
    }

    fn test_state() -> AppState {
        let config = test_config();
        let chat = ChatClient::new(&config.chat).unwrap();
        let tts = Some(TtsClient::new(&config.tts).unwrap());
        let ocr = Arc::new(TesseractEngine::new(&config.ocr));
        AppState::new(config, chat, tts, ocr)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_body(fields: &[(&str, &str)]) -> (String, String) {
        let boundary = "lektor-test-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    #[tokio::test]
    async fn home_returns_html_health_string() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("POST /chat"));
    }

    #[tokio::test]
    async fn diag_reports_engine_down_for_missing_binary() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/diag")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["tesseract_available"], false);
        assert_eq!(json["tesseract_cmd"], "/nonexistent/tesseract");
        assert!(json.get("tesseract_version").is_none());
    }

    #[tokio::test]
    async fn chat_rejects_whitespace_prompt() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"prompt": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn chat_rejects_missing_prompt_field() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/chat")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn agent_tts_rejects_missing_message() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/agent-tts")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"lang": "en"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn agent_ocr_tts_requires_message_or_file() {
        let app = create_router(test_state());
        let (content_type, body) = multipart_body(&[("lang", "pl")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/agent-ocr-tts")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn ocr_requires_a_file() {
        let app = create_router(test_state());
        let (content_type, body) = multipart_body(&[("sendToAgent", "true")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ocr")
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
