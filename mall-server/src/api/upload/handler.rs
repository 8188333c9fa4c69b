//! Image Upload Handler
//!
//! 上传内容通过解码验证，统一重编码为 JPEG 后以 uuid 命名存储；
//! 原始字节不落盘。

use std::io::Cursor;

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use image::ImageFormat;
use serde::Serialize;
use uuid::Uuid;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, ok_with_message};

/// Maximum file size (2MB)
const MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

/// JPEG 输出质量
const JPEG_QUALITY: u8 = 85;

/// 上传响应数据
#[derive(Debug, Serialize)]
pub struct UploadData {
    pub url: String,
    pub filename: String,
}

/// 接受的图片容器格式
fn is_supported(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP
    )
}

/// 校验并重编码为 JPEG
fn process_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let format = image::guess_format(data)
        .map_err(|_| AppError::new(ErrorCode::UnsupportedFileFormat))?;
    if !is_supported(format) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported image format: {format:?}"),
        ));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Failed to encode image: {e}"),
            )
        })?;
    Ok(buffer)
}

/// POST /api/upload - 上传商品图片
///
/// multipart 字段名为 `file`，限 2MB，jpeg/png/gif/webp。
pub async fn upload_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadData>>> {
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_request(format!("Failed to read upload: {e}")))?;
        file_bytes = Some(data.to_vec());
        break;
    }

    let data = file_bytes.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large ({} bytes, max {} bytes)",
                data.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let jpeg = process_image(&data)?;

    let filename = format!("{}.jpg", Uuid::new_v4());
    let dir = state.uploads_dir();
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::with_message(
            ErrorCode::FileStorageFailed,
            format!("Failed to create uploads dir: {e}"),
        )
    })?;
    tokio::fs::write(dir.join(&filename), &jpeg)
        .await
        .map_err(|e| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to store file: {e}"),
            )
        })?;

    tracing::info!(filename = %filename, bytes = jpeg.len(), "Image uploaded");
    Ok(ok_with_message(
        UploadData {
            url: format!("/uploads/{filename}"),
            filename,
        },
        "Upload successful",
    ))
}

/// GET /uploads/{filename} - 读取已上传图片
///
/// 文件名不允许路径分隔符和 `..`，防止目录穿越。
pub async fn serve_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(AppError::invalid_request("Invalid filename"));
    }

    let path = state.uploads_dir().join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found("File"))?;

    let mime = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();
    Ok(([(http::header::CONTENT_TYPE, mime)], bytes))
}
