#[cfg(test)]
#[path = "request_config_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, EnumVariantNames, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApiPlatform {
    #[default]
    ModelScope,
    Bailian,
}

impl ApiPlatform {
    pub fn parse(text: &str) -> Option<ApiPlatform> {
        return ApiPlatform::iter().find(|e| return e.to_string() == text);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SettingKey {
    ChatModel,
    VlModel,
    ImageModel,
    AgeRange,
    ApiPlatform,
    BailianApiKey,
    DsLlmId,
}

impl SettingKey {
    pub fn parse(text: &str) -> Option<SettingKey> {
        return SettingKey::iter().find(|e| return e.to_string() == text);
    }
}

/// Model and behaviour selection merged into every backend call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub chat_model: String,
    pub vl_model: String,
    pub image_model: String,
    pub age_range: String,
    pub api_platform: ApiPlatform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bailian_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ds_llm_id: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> RequestConfig {
        return RequestConfig {
            chat_model: "Qwen/Qwen3-30B-A3B-Instruct-2507".to_string(),
            vl_model: "Qwen/Qwen3-VL-8B-Instruct".to_string(),
            image_model: "black-forest-labs/FLUX.1-Krea-dev".to_string(),
            age_range: "6-8岁".to_string(),
            api_platform: ApiPlatform::default(),
            bailian_api_key: None,
            ds_llm_id: None,
        };
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    return Some(value.to_string());
}

impl RequestConfig {
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let required = matches!(
            key,
            SettingKey::ChatModel | SettingKey::VlModel | SettingKey::ImageModel | SettingKey::AgeRange
        );
        if required && value.is_empty() {
            bail!(format!("Setting '{key}' cannot be empty"));
        }

        match key {
            SettingKey::ChatModel => self.chat_model = value.to_string(),
            SettingKey::VlModel => self.vl_model = value.to_string(),
            SettingKey::ImageModel => self.image_model = value.to_string(),
            SettingKey::AgeRange => self.age_range = value.to_string(),
            SettingKey::ApiPlatform => {
                let platform = match ApiPlatform::parse(value) {
                    Some(platform) => platform,
                    None => bail!(format!(
                        "Unknown API platform '{value}'. Possible values are: {}",
                        ApiPlatform::iter()
                            .map(|e| return e.to_string())
                            .collect::<Vec<String>>()
                            .join(", ")
                    )),
                };
                self.api_platform = platform;
            }
            SettingKey::BailianApiKey => self.bailian_api_key = optional(value),
            SettingKey::DsLlmId => self.ds_llm_id = optional(value),
        }

        return Ok(());
    }

    pub fn get(&self, key: SettingKey) -> Option<String> {
        return match key {
            SettingKey::ChatModel => Some(self.chat_model.to_string()),
            SettingKey::VlModel => Some(self.vl_model.to_string()),
            SettingKey::ImageModel => Some(self.image_model.to_string()),
            SettingKey::AgeRange => Some(self.age_range.to_string()),
            SettingKey::ApiPlatform => Some(self.api_platform.to_string()),
            SettingKey::BailianApiKey => self.bailian_api_key.clone(),
            SettingKey::DsLlmId => self.ds_llm_id.clone(),
        };
    }

    /// Flat field map as sent on the wire. Unset optional fields are omitted.
    pub fn to_map(&self) -> Map<String, Value> {
        return match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
    }
}
