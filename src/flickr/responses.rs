use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::error::FlickrError;

/// Flickr wraps text values as `{"_content": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(rename = "_content", default)]
    pub content: String,
}

/// Flickr is inconsistent about numbers vs numeric strings in paging fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Number(u64),
    Text(String),
}

impl LenientNumber {
    pub fn value(&self) -> u64 {
        match self {
            LenientNumber::Number(n) => *n,
            LenientNumber::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// Response from `flickr.photosets.getList`.
#[derive(Debug, Deserialize)]
pub struct PhotosetListResponse {
    pub photosets: PhotosetPage,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetPage {
    #[serde(default)]
    pub page: Option<LenientNumber>,
    #[serde(default)]
    pub pages: Option<LenientNumber>,
    #[serde(default)]
    pub photoset: Vec<PhotosetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetEntry {
    pub id: String,
    #[serde(default)]
    pub title: Content,
}

/// Response from `flickr.photosets.create`.
#[derive(Debug, Deserialize)]
pub struct PhotosetCreateResponse {
    pub photoset: CreatedPhotoset,
}

#[derive(Debug, Deserialize)]
pub struct CreatedPhotoset {
    pub id: String,
}

/// Response from `flickr.test.login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub id: String,
    #[serde(default)]
    pub username: Content,
}

/// Reject `stat="fail"` envelopes, returning the body otherwise.
pub fn check_stat(method: &str, value: Value) -> Result<Value, FlickrError> {
    match value.get("stat").and_then(Value::as_str) {
        Some("ok") => Ok(value),
        Some("fail") => Err(FlickrError::Api {
            code: match value.get("code") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "unknown".to_string(),
            },
            message: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        other => Err(FlickrError::MalformedResponse {
            method: method.to_string(),
            reason: format!("unexpected stat {:?}", other),
        }),
    }
}

/// Parsed `<rsp>` document returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResponse {
    Ok { photo_id: Option<String> },
    Fail { code: String, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadResponseError {
    #[error("response is not well-formed XML: {0}")]
    Xml(String),
    #[error("response has no <rsp> element")]
    MissingRsp,
    #[error("response ended before </rsp>")]
    Truncated,
    #[error("unknown response status {0:?}")]
    UnknownStat(String),
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, UploadResponseError> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| UploadResponseError::Xml(e.to_string()))?;
    match attr {
        Some(a) => a
            .unescape_value()
            .map(|v| Some(v.into_owned()))
            .map_err(|e| UploadResponseError::Xml(e.to_string())),
        None => Ok(None),
    }
}

/// Parse the XML body of an upload response:
///
/// ```xml
/// <rsp stat="ok"><photoid>1234</photoid></rsp>
/// <rsp stat="fail"><err code="5" msg="Filetype was not recognised" /></rsp>
/// ```
pub fn parse_upload_response(body: &str) -> Result<UploadResponse, UploadResponseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stat: Option<String> = None;
    let mut closed = false;
    let mut in_photo_id = false;
    let mut photo_id: Option<String> = None;
    let mut error: Option<(String, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| UploadResponseError::Xml(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                match e.name().as_ref() {
                    b"rsp" => {
                        stat = Some(attribute(e, "stat")?.unwrap_or_default());
                        closed = !is_start;
                    }
                    b"photoid" => in_photo_id = is_start,
                    b"err" => {
                        error = Some((
                            attribute(e, "code")?.unwrap_or_else(|| "unknown".to_string()),
                            attribute(e, "msg")?.unwrap_or_default(),
                        ));
                    }
                    _ => {}
                }
            }
            Event::Text(ref t) if in_photo_id => {
                let text = t
                    .unescape()
                    .map_err(|e| UploadResponseError::Xml(e.to_string()))?;
                photo_id = Some(text.trim().to_string());
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"photoid" => in_photo_id = false,
                b"rsp" => closed = true,
                _ => {}
            },
            _ => {}
        }
    }

    let stat = stat.ok_or(UploadResponseError::MissingRsp)?;
    if !closed {
        return Err(UploadResponseError::Truncated);
    }
    match stat.as_str() {
        "ok" => Ok(UploadResponse::Ok {
            photo_id: photo_id.filter(|id| !id.is_empty()),
        }),
        "fail" => {
            let (code, message) = error.unwrap_or_else(|| ("unknown".to_string(), String::new()));
            Ok(UploadResponse::Fail { code, message })
        }
        _ => Err(UploadResponseError::UnknownStat(stat)),
    }
}
