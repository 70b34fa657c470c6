#![allow(dead_code)]

use std::fs;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Match, Mock, MockBuilder, Request, ResponseTemplate};

pub const AUTH_PATH: &str = "/webapi/auth.cgi";
pub const TASK_PATH: &str = "/webapi/DownloadStation/task.cgi";

/// # Panics
///
/// Will panic if a file can't be read or missing
#[must_use = "This function returns the body of the file as a string"]
pub fn body_from_file(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

pub struct FormParamExactMatcher(String, String);

impl FormParamExactMatcher {
    /// Specify the expected value for a form parameter.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        let key = key.into();
        let value = value.into();
        Self(key, value)
    }
}

/// Shorthand for [`FormParamExactMatcher::new`].
pub fn form_param<K, V>(key: K, value: V) -> FormParamExactMatcher
where
    K: Into<String>,
    V: Into<String>,
{
    FormParamExactMatcher::new(key, value)
}

impl Match for FormParamExactMatcher {
    fn matches(&self, request: &Request) -> bool {
        form_urlencoded::parse(&request.body)
            .any(|q| q.0 == self.0.as_str() && q.1 == self.1.as_str())
    }
}

/// JSON response with the body taken from `response_file`
pub fn json_response(status: u16, response_file: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .append_header("content-type", "application/json")
        .set_body_string(body_from_file(response_file))
}

/// Form POST to `endpoint` carrying every pair of `params`
pub fn form_post(endpoint: &str, params: &[(&str, &str)]) -> MockBuilder {
    let mut builder = Mock::given(method("POST"))
        .and(path(endpoint))
        .and(header("content-type", "application/x-www-form-urlencoded"));
    for (key, value) in params {
        builder = builder.and(form_param(*key, *value));
    }
    builder
}

/// Login as `test` / `test123`
pub fn login_mock(response: ResponseTemplate) -> Mock {
    form_post(
        AUTH_PATH,
        &[
            ("api", "SYNO.API.Auth"),
            ("version", "2"),
            ("method", "login"),
            ("account", "test"),
            ("passwd", "test123"),
            ("session", "DownloadStation"),
            ("format", "sid"),
        ],
    )
    .respond_with(response)
}

/// Task creation from `uri` with session ID `456`
pub fn create_uri_mock(uri: &str, response: ResponseTemplate) -> Mock {
    form_post(
        TASK_PATH,
        &[
            ("api", "SYNO.DownloadStation.Task"),
            ("version", "1"),
            ("method", "create"),
            ("session", "DownloadStation"),
            ("_sid", "456"),
            ("uri", uri),
        ],
    )
    .respond_with(response)
}

/// Multipart task creation uploading `file_name` with `contents`
pub fn create_file_mock(file_name: &str, contents: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path(TASK_PATH))
        .and(header_regex("content-type", "multipart/form-data"))
        .and(body_string_contains("SYNO.DownloadStation.Task"))
        .and(body_string_contains("name=\"_sid\"\r\n\r\n456"))
        .and(body_string_contains(format!(
            "name=\"file\"; filename=\"{file_name}\""
        )))
        .and(body_string_contains(contents))
        .respond_with(response)
}

/// Logout of session `456`
pub fn logout_mock(response: ResponseTemplate) -> Mock {
    form_post(
        AUTH_PATH,
        &[
            ("api", "SYNO.API.Auth"),
            ("version", "1"),
            ("method", "logout"),
            ("session", "DownloadStation"),
            ("_sid", "456"),
        ],
    )
    .respond_with(response)
}
