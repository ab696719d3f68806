//! Upload and download through the real router

use axum::http::{header, Method, StatusCode};

use crate::common::test_support::{
    authed_router, json_request, multipart_request, send, test_pool, test_router,
};

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n%%EOF\n";

async fn cv_file_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cv_files")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_upload_then_download_returns_identical_bytes() {
    let pool = test_pool().await;
    let (router, token) = authed_router(pool.clone()).await;

    let upload = send(
        &router,
        multipart_request("cv", "Ama Mensah CV.pdf", "application/pdf", PDF_BYTES),
    )
    .await;
    assert_eq!(upload.status, StatusCode::OK);
    let body = upload.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["originalName"], "Ama Mensah CV.pdf");
    assert_eq!(body["size"], PDF_BYTES.len());
    assert_eq!(body["type"], "application/pdf");
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("_Ama_Mensah_CV.pdf"), "{}", filename);
    assert!(filename.split('_').next().unwrap().parse::<i64>().is_ok());

    let file_id = body["fileId"].as_i64().unwrap();
    let download = send(
        &router,
        json_request(
            Method::GET,
            &format!("/api/cv-files/{}", file_id),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.body, PDF_BYTES);
    assert_eq!(download.headers[header::CONTENT_TYPE], "application/pdf");
    let disposition = download.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Ama Mensah CV.pdf\""));
    assert_eq!(cv_file_count(&pool).await, 1);
}

#[tokio::test]
async fn test_generic_content_type_is_derived_from_extension() {
    let pool = test_pool().await;
    let router = test_router(pool);

    let upload = send(
        &router,
        multipart_request("cv", "cv.pdf", "application/octet-stream", PDF_BYTES),
    )
    .await;
    assert_eq!(upload.status, StatusCode::OK);
    assert_eq!(upload.json()["type"], "application/pdf");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_without_storing() {
    let pool = test_pool().await;
    let router = test_router(pool.clone());

    let mut content = PDF_BYTES.to_vec();
    content.resize(5 * 1024 * 1024 + 1, b' ');

    let response = send(
        &router,
        multipart_request("cv", "big.pdf", "application/pdf", &content),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(cv_file_count(&pool).await, 0);
}

#[tokio::test]
async fn test_disallowed_extension_is_rejected_without_storing() {
    let pool = test_pool().await;
    let router = test_router(pool.clone());

    let response = send(
        &router,
        multipart_request("cv", "cv.exe", "application/pdf", PDF_BYTES),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(cv_file_count(&pool).await, 0);
}

#[tokio::test]
async fn test_disguised_image_is_rejected() {
    let pool = test_pool().await;
    let router = test_router(pool.clone());
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];

    let response = send(
        &router,
        multipart_request("cv", "cv.pdf", "application/pdf", &png),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(cv_file_count(&pool).await, 0);
}

#[tokio::test]
async fn test_empty_or_missing_file_is_rejected() {
    let pool = test_pool().await;
    let router = test_router(pool.clone());

    let empty = send(&router, multipart_request("cv", "cv.pdf", "application/pdf", b"")).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.json()["code"], "VALIDATION_ERROR");

    let wrong_field = send(
        &router,
        multipart_request("resume", "cv.pdf", "application/pdf", PDF_BYTES),
    )
    .await;
    assert_eq!(wrong_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_field.json()["error"], "No file uploaded");

    assert_eq!(cv_file_count(&pool).await, 0);
}

#[tokio::test]
async fn test_download_errors() {
    let pool = test_pool().await;
    let (router, token) = authed_router(pool).await;

    let missing = send(
        &router,
        json_request(Method::GET, "/api/cv-files/999", Some(&token), None),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["error"], "File not found");

    let invalid = send(
        &router,
        json_request(Method::GET, "/api/cv-files/abc", Some(&token), None),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.json()["error"], "Invalid file ID");
}

#[tokio::test]
async fn test_non_ascii_original_name_is_preserved() {
    let pool = test_pool().await;
    let (router, token) = authed_router(pool).await;

    let upload = send(
        &router,
        multipart_request("cv", "Kwamé CV.pdf", "application/pdf", PDF_BYTES),
    )
    .await;
    assert_eq!(upload.status, StatusCode::OK);
    let body = upload.json();
    assert!(body["filename"].as_str().unwrap().ends_with("_Kwam__CV.pdf"));

    let download = send(
        &router,
        json_request(
            Method::GET,
            &format!("/api/cv-files/{}", body["fileId"]),
            Some(&token),
            None,
        ),
    )
    .await;
    let disposition = download.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.ends_with("filename*=UTF-8''Kwam%C3%A9%20CV.pdf"));
}
