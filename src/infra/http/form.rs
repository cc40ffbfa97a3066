//! Form decoding for the highlight endpoint.
//!
//! Accepts url-encoded and multipart bodies. A missing content type is read as
//! url-encoded; any other content type yields an empty form. The first
//! occurrence of a repeated field wins and file parts are ignored. Invalid
//! UTF-8 is replaced rather than rejected, for both encodings.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use tracing::warn;
use url::form_urlencoded;

use crate::{application::error::HttpError, domain::highlight::HighlightRequest};

const SOURCE: &str = "infra::http::form";
const LANGUAGE_FIELD: &str = "language";
const TEXT_FIELD: &str = "text";

/// Extracts a [`HighlightRequest`] from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightForm(pub HighlightRequest);

enum FormEncoding {
    UrlEncoded,
    Multipart,
    Unsupported,
}

impl<S> FromRequest<S> for HighlightForm
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match form_encoding(req.headers()) {
            FormEncoding::UrlEncoded => {
                let body = Bytes::from_request(req, state).await.map_err(|rejection| {
                    HttpError::new(
                        SOURCE,
                        rejection.status(),
                        "Could not read request body",
                        rejection.body_text(),
                    )
                })?;
                Ok(Self(parse_urlencoded(&body)))
            }
            FormEncoding::Multipart => {
                let mut multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
                    HttpError::new(
                        SOURCE,
                        rejection.status(),
                        "Invalid form data",
                        rejection.body_text(),
                    )
                })?;
                read_multipart(&mut multipart).await.map(Self)
            }
            FormEncoding::Unsupported => Ok(Self(HighlightRequest::default())),
        }
    }
}

fn form_encoding(headers: &HeaderMap) -> FormEncoding {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return FormEncoding::UrlEncoded;
    };

    let content_type = value.to_str().unwrap_or_default().to_ascii_lowercase();
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    match mime {
        "application/x-www-form-urlencoded" => FormEncoding::UrlEncoded,
        "multipart/form-data" => FormEncoding::Multipart,
        _ => FormEncoding::Unsupported,
    }
}

#[derive(Default)]
struct FormFields {
    language: Option<String>,
    text: Option<String>,
}

impl FormFields {
    fn offer(&mut self, name: &str, value: impl FnOnce() -> String) {
        let slot = match name {
            LANGUAGE_FIELD => &mut self.language,
            TEXT_FIELD => &mut self.text,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value());
        }
    }

    fn wants(&self, name: &str) -> bool {
        match name {
            LANGUAGE_FIELD => self.language.is_none(),
            TEXT_FIELD => self.text.is_none(),
            _ => false,
        }
    }

    fn into_request(self) -> HighlightRequest {
        HighlightRequest {
            language: self.language.unwrap_or_default(),
            text: self.text.unwrap_or_default(),
        }
    }
}

fn parse_urlencoded(body: &[u8]) -> HighlightRequest {
    let mut fields = FormFields::default();
    for (name, value) in form_urlencoded::parse(body) {
        fields.offer(&name, || value.into_owned());
    }
    fields.into_request()
}

async fn read_multipart(multipart: &mut Multipart) -> Result<HighlightRequest, HttpError> {
    let mut fields = FormFields::default();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                if !fields.wants(&name) {
                    continue;
                }

                let bytes = field.bytes().await.map_err(|err| {
                    HttpError::new(SOURCE, err.status(), "Invalid form data", err.body_text())
                })?;
                fields.offer(&name, || String::from_utf8_lossy(&bytes).into_owned());
            }
            Ok(None) => break,
            Err(err) => {
                let status = err.status();
                warn!(
                    target = SOURCE,
                    status = status.as_u16(),
                    error = %err,
                    "failed to read multipart payload"
                );
                return Err(HttpError::new(
                    SOURCE,
                    status,
                    "Invalid form data",
                    err.body_text(),
                ));
            }
        }
    }

    Ok(fields.into_request())
}
