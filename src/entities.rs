use serde::Deserialize;

/// Session label sent with every request
pub const SESSION: &str = "DownloadStation";

/// Response from Synology API
#[derive(Deserialize, Debug)]
pub struct SynologyResponse<D> {
    pub success: bool,
    pub data: Option<D>,
    pub error: Option<ApiError>,
}

/// Authentication response data
#[derive(Deserialize, Debug)]
pub struct AuthData {
    /// Session ID used for authenticated requests
    pub sid: String,
}

/// Error information from Synology API
#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: i32,
}

/// The web APIs this client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    Task,
}

impl Endpoint {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Auth => "SYNO.API.Auth",
            Endpoint::Task => "SYNO.DownloadStation.Task",
        }
    }

    /// Path of the CGI endpoint below `<host>/webapi`
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Auth => "/webapi/auth.cgi",
            Endpoint::Task => "/webapi/DownloadStation/task.cgi",
        }
    }

    /// Human readable description of an API error code.
    ///
    /// Codes below 400 are shared by every API, the rest are API specific.
    #[must_use]
    pub fn describe_error(self, code: i32) -> &'static str {
        match (self, code) {
            (_, 100) => "Unknown error",
            (_, 101) => "Invalid parameter",
            (_, 102) => "The requested API does not exist",
            (_, 103) => "The requested method does not exist",
            (_, 104) => "The requested version does not support the functionality",
            (_, 105) => "The logged in session does not have permission",
            (_, 106) => "Session timeout",
            (_, 107) => "Session interrupted by duplicate login",
            (Endpoint::Auth, 400) => "No such account or incorrect password",
            (Endpoint::Auth, 401) => "Account disabled",
            (Endpoint::Auth, 402) => "Permission denied",
            (Endpoint::Auth, 403) => "2-step verification code required",
            (Endpoint::Auth, 404) => "Failed to authenticate 2-step verification code",
            (Endpoint::Task, 400) => "File upload failed",
            (Endpoint::Task, 401) => "Max number of tasks reached",
            (Endpoint::Task, 402) => "Destination denied",
            (Endpoint::Task, 403) => "Destination does not exist",
            (Endpoint::Task, 404) => "Invalid task id",
            (Endpoint::Task, 405) => "Invalid task action",
            (Endpoint::Task, 406) => "No default destination",
            (Endpoint::Task, 407) => "Set destination failed",
            (Endpoint::Task, 408) => "File does not exist",
            _ => "Unrecognized error code",
        }
    }
}
