#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;

use anyhow::Result;
use base64::engine::general_purpose;
use base64::Engine;
use serde_json::json;
use serde_json::Map;
use serde_json::Value;
use tokio::fs;

use crate::domain::models::GatewayError;
use crate::domain::models::PendingCall;
use crate::domain::models::Tool;
use crate::infrastructure::backend::AuthenticatedRequestGateway;

fn mime_type(file_path: &path::Path) -> &'static str {
    let ext = file_path
        .extension()
        .and_then(|e| return e.to_str())
        .map(|e| return e.to_lowercase())
        .unwrap_or_default();

    return match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    };
}

/// Reads a file into a `data:` URL, the format the backend expects for images.
pub async fn file_to_data_url(file_path: &path::Path) -> Result<String> {
    let bytes = fs::read(file_path).await?;
    let payload = general_purpose::STANDARD.encode(bytes);

    return Ok(format!(
        "data:{mime};base64,{payload}",
        mime = mime_type(file_path)
    ));
}

fn to_body(value: Value) -> Map<String, Value> {
    return match value {
        Value::Object(map) => map
            .into_iter()
            .filter(|(_, val)| return !val.is_null())
            .collect(),
        _ => Map::new(),
    };
}

fn image_url(pending: &mut PendingCall, res: &Value) -> Result<String, GatewayError> {
    let url = res
        .get("imageUrl")
        .and_then(|e| return e.as_str())
        .map(|e| return e.to_string())
        .ok_or_else(|| {
            return GatewayError::MalformedResponse("response has no imageUrl".to_string());
        });
    if let Err(err) = &url {
        pending.fail(err);
    }

    return url;
}

/// Typed entry points for each backend feature.
pub struct Tools {
    gateway: Arc<AuthenticatedRequestGateway>,
}

impl Tools {
    pub fn new(gateway: Arc<AuthenticatedRequestGateway>) -> Tools {
        return Tools { gateway };
    }

    /// Runs one call while keeping `pending` up to date.
    async fn execute(
        &self,
        pending: &mut PendingCall,
        tool: Tool,
        body: Value,
    ) -> Result<Value, GatewayError> {
        pending.start();

        let res = self.gateway.call(&tool.endpoint(), to_body(body)).await;
        match &res {
            Ok(value) => pending.succeed(value.clone()),
            Err(err) => pending.fail(err),
        }

        return res;
    }

    pub async fn colorize_lineart(
        &self,
        pending: &mut PendingCall,
        base64_image: &str,
        prompt: &str,
    ) -> Result<String, GatewayError> {
        let res = self
            .execute(
                pending,
                Tool::ColorizeLineart,
                json!({ "base64_image": base64_image, "prompt": prompt }),
            )
            .await?;
        return image_url(pending, &res);
    }

    pub async fn creative_workshop(
        &self,
        pending: &mut PendingCall,
        content_image: &str,
        style_image: Option<&str>,
        prompt: Option<&str>,
    ) -> Result<String, GatewayError> {
        let res = self
            .execute(
                pending,
                Tool::CreativeWorkshop,
                json!({ "content_image": content_image, "style_image": style_image, "prompt": prompt }),
            )
            .await?;
        return image_url(pending, &res);
    }

    pub async fn portrait_workshop(
        &self,
        pending: &mut PendingCall,
        portrait_image: &str,
        style_image: Option<&str>,
        preset_style_index: Option<u32>,
    ) -> Result<String, GatewayError> {
        let res = self
            .execute(
                pending,
                Tool::PortraitWorkshop,
                json!({
                    "portrait_image": portrait_image,
                    "style_image": style_image,
                    "preset_style_index": preset_style_index,
                }),
            )
            .await?;
        return image_url(pending, &res);
    }

    /// Returns the text of the first chat completion choice.
    pub async fn ask_question(
        &self,
        pending: &mut PendingCall,
        question: &str,
    ) -> Result<String, GatewayError> {
        let res = self
            .execute(
                pending,
                Tool::AskQuestion,
                json!({ "messages": [{ "role": "user", "content": question }] }),
            )
            .await?;

        let answer = res
            .pointer("/choices/0/message/content")
            .and_then(|e| return e.as_str())
            .map(|e| return e.to_string())
            .ok_or_else(|| {
                return GatewayError::MalformedResponse(
                    "response has no chat completion".to_string(),
                );
            });
        if let Err(err) = &answer {
            pending.fail(err);
        }

        return answer;
    }

    pub async fn generate_ideas(
        &self,
        pending: &mut PendingCall,
        theme: &str,
    ) -> Result<Value, GatewayError> {
        return self
            .execute(pending, Tool::GenerateIdeas, json!({ "theme": theme }))
            .await;
    }

    pub async fn mood_painting(
        &self,
        pending: &mut PendingCall,
        mood: &str,
        theme: &str,
    ) -> Result<Value, GatewayError> {
        return self
            .execute(pending, Tool::MoodPainting, json!({ "mood": mood, "theme": theme }))
            .await;
    }

    pub async fn critique_homework(
        &self,
        pending: &mut PendingCall,
        student_image: &str,
        theme: Option<&str>,
    ) -> Result<Value, GatewayError> {
        return self
            .execute(
                pending,
                Tool::CritiqueHomework,
                json!({ "student_image": student_image, "theme": theme }),
            )
            .await;
    }

    /// Asks for a guided explanation of a museum artwork. Missing details are
    /// left out of the request.
    pub async fn explain_artwork(
        &self,
        pending: &mut PendingCall,
        title: &str,
        artist: Option<&str>,
        medium: Option<&str>,
        date: Option<&str>,
    ) -> Result<Value, GatewayError> {
        return self
            .execute(
                pending,
                Tool::GalleryExplain,
                json!({ "title": title, "artist": artist, "medium": medium, "date": date }),
            )
            .await;
    }
}
