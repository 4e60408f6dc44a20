//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, PostContent, PostContentPatch, PostValidationError, TagName};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidTagName,
    InvalidTitle,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTagName => "invalid_tag_name",
            Self::InvalidTitle => "invalid_title",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const TAGS: FieldName = FieldName::new("tags");
pub(crate) const TAG_IDS: FieldName = FieldName::new("tagIds");
pub(crate) const POST_ID: FieldName = FieldName::new("postId");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

fn invalid_index_error(
    field: FieldName,
    code: ErrorCode,
    message: String,
    index: usize,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "index": index,
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a comma-separated list of UUIDs, ignoring empty segments.
pub(crate) fn parse_uuid_csv(raw: &str, field: FieldName) -> Result<Vec<Uuid>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| {
            Uuid::parse_str(segment).map_err(|_| {
                invalid_index_error(
                    field,
                    ErrorCode::InvalidUuid,
                    format!("{} must contain valid UUIDs", field.as_str()),
                    index,
                    segment,
                )
            })
        })
        .collect()
}

pub(crate) fn parse_tag_names(
    values: Vec<String>,
    field: FieldName,
) -> Result<Vec<TagName>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            TagName::new(&value).map_err(|err| {
                invalid_index_error(
                    field,
                    ErrorCode::InvalidTagName,
                    err.to_string(),
                    index,
                    &value,
                )
            })
        })
        .collect()
}

fn invalid_title_error(err: &PostValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": TITLE.as_str(),
        "code": ErrorCode::InvalidTitle.as_str(),
    }))
}

pub(crate) fn parse_post_content(
    title: Option<String>,
    body: Option<String>,
) -> Result<PostContent, Error> {
    let title = title.ok_or_else(|| missing_field_error(TITLE))?;
    PostContent::new(title, body.unwrap_or_default()).map_err(|err| invalid_title_error(&err))
}

pub(crate) fn parse_post_patch(
    title: Option<String>,
    body: Option<String>,
) -> Result<PostContentPatch, Error> {
    PostContentPatch::new(title, body).map_err(|err| invalid_title_error(&err))
}
