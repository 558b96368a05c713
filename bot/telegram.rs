use std::time::Duration;

use reqwest::blocking::multipart::{Form as MultipartForm, Part as MultipartPart};
use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use polybot::dispatch::{Attachment, ChatId, Transport};
use polybot::DispatchError;

const API_BASE: &str = "https://api.telegram.org";

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BotUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    file_path: Option<String>,
}

/// Blocking Bot API client; the `Transport` used in production.
pub struct TelegramClient {
    http: HttpClient,
    token: String,
    timeout: Duration,
}

impl TelegramClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(TelegramClient { http, token: token.to_owned(), timeout })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", API_BASE, self.token, file_path)
    }

    fn unwrap_envelope<T>(method: &str, response: ApiResponse<T>) -> Result<T, DispatchError> {
        if !response.ok {
            return Err(DispatchError::Transport(format!(
                "{} failed: {}", method, response.description.unwrap_or_default()
            )));
        }
        response
            .result
            .ok_or_else(|| DispatchError::Transport(format!("{} returned no result", method)))
    }

    fn call_json<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
        timeout: Duration,
    ) -> Result<T, DispatchError> {
        let response: ApiResponse<T> = self
            .http
            .post(self.method_url(method))
            .timeout(timeout)
            .json(&body)
            .send()
            .and_then(|r| r.json())
            .map_err(|e| DispatchError::Transport(format!("{}: {}", method, e)))?;
        Self::unwrap_envelope(method, response)
    }

    pub fn get_me(&self) -> Result<BotUser, DispatchError> {
        self.call_json("getMe", json!({}), self.timeout)
    }

    pub fn remove_webhook(&self) -> Result<(), DispatchError> {
        let _: bool = self.call_json("deleteWebhook", json!({}), self.timeout)?;
        Ok(())
    }

    pub fn set_webhook(&self, url: &str, timeout: Duration) -> Result<(), DispatchError> {
        let _: bool = self.call_json("setWebhook", json!({ "url": url }), timeout)?;
        Ok(())
    }
}

impl Transport for TelegramClient {
    fn fetch_attachment(&self, file_id: &str) -> Result<Attachment, DispatchError> {
        let info: FileInfo = self.call_json("getFile", json!({ "file_id": file_id }), self.timeout)?;
        let file_path = info
            .file_path
            .ok_or_else(|| DispatchError::Transport(format!("file {} has no download path", file_id)))?;

        let response = self
            .http
            .get(self.file_url(&file_path))
            .send()
            .map_err(|e| DispatchError::Transport(format!("download {}: {}", file_path, e)))?;
        if !response.status().is_success() {
            return Err(DispatchError::Transport(format!(
                "download {} failed ({})", file_path, response.status().as_u16()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| DispatchError::Transport(format!("download {}: {}", file_path, e)))?
            .to_vec();
        Ok(Attachment { file_path, bytes })
    }

    fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), DispatchError> {
        let _: serde_json::Value = self.call_json(
            "sendMessage",
            json!({ "chat_id": chat_id, "text": text }),
            self.timeout,
        )?;
        Ok(())
    }

    fn send_text_with_quote(
        &self,
        chat_id: ChatId,
        text: &str,
        quoted_msg_id: i64,
    ) -> Result<(), DispatchError> {
        let _: serde_json::Value = self.call_json(
            "sendMessage",
            json!({ "chat_id": chat_id, "text": text, "reply_to_message_id": quoted_msg_id }),
            self.timeout,
        )?;
        Ok(())
    }

    fn send_photo(&self, chat_id: ChatId, file_name: &str, bytes: Vec<u8>) -> Result<(), DispatchError> {
        let form = MultipartForm::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", MultipartPart::bytes(bytes).file_name(file_name.to_owned()));
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .and_then(|r| r.json())
            .map_err(|e| DispatchError::Transport(format!("sendPhoto: {}", e)))?;
        Self::unwrap_envelope("sendPhoto", response).map(|_| ())
    }
}
