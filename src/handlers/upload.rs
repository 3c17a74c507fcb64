use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, web};
use futures_util::StreamExt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;

/// Where uploaded gig images are written and how they are addressed afterwards.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub public_base: String,
    pub max_bytes: usize,
}

/// Picks a safe file extension: the client's filename if it has a short
/// alphanumeric one, otherwise the image subtype (`svg+xml` → `svg`).
fn file_extension(filename: Option<&str>, subtype: &str) -> String {
    let from_name = filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    from_name.unwrap_or_else(|| {
        let ext: String = subtype
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpeg" => "jpg".to_string(),
            "" => "img".to_string(),
            _ => ext,
        }
    })
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message.into(),
    }))
}

/// POST /api/upload: store the multipart `file` part and return its public URL.
pub async fn upload_image(
    user: AuthenticatedUser,
    settings: web::Data<UploadSettings>,
    mut payload: Multipart,
) -> impl Responder {
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => return bad_request(format!("Malformed multipart body: {e}")),
        };

        if field.name() != Some("file") {
            // Drain parts we do not care about.
            while let Some(chunk) = field.next().await {
                if let Err(e) = chunk {
                    return bad_request(format!("Malformed multipart body: {e}"));
                }
            }
            continue;
        }

        let subtype = match field.content_type() {
            Some(mime) if mime.type_().as_str() == "image" => mime.subtype().as_str().to_string(),
            _ => return bad_request("Only image uploads are accepted"),
        };
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => return bad_request(format!("Malformed multipart body: {e}")),
            };
            if bytes.len() + chunk.len() > settings.max_bytes {
                return HttpResponse::PayloadTooLarge().json(serde_json::json!({
                    "error": format!("Image exceeds {} bytes", settings.max_bytes),
                }));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return bad_request("Uploaded file is empty");
        }

        let name = format!(
            "{}.{}",
            Uuid::new_v4(),
            file_extension(filename.as_deref(), &subtype)
        );
        let path = settings.dir.join(&name);

        if let Err(e) = tokio::fs::create_dir_all(&settings.dir).await {
            tracing::error!("Error preparing upload dir {}: {e}", settings.dir.display());
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error storing image",
            }));
        }
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            tracing::error!("Error writing upload {}: {e}", path.display());
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error storing image",
            }));
        }

        tracing::info!(user_id = %user.0.id, file = %name, size = bytes.len(), "Image uploaded");
        return HttpResponse::Created().json(serde_json::json!({
            "url": format!("{}/{}", settings.public_base, name),
        }));
    }

    bad_request("Missing 'file' part")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_prefers_filename() {
        assert_eq!(file_extension(Some("Logo.PNG"), "png"), "png");
        assert_eq!(file_extension(Some("photo.jpeg"), "jpeg"), "jpeg");
    }

    #[test]
    fn extension_falls_back_to_subtype() {
        assert_eq!(file_extension(None, "jpeg"), "jpg");
        assert_eq!(file_extension(Some("noext"), "svg+xml"), "svg");
        assert_eq!(file_extension(Some("evil.p/hp"), "webp"), "webp");
        assert_eq!(file_extension(None, ""), "img");
    }
}
