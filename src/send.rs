use crate::client::SynoDS;
use crate::config::read_config;
use crate::target::{DownloadTarget, FileUpload};
use anyhow::Result;
use log::{debug, error};

/// Hands `add_url` to Download Station using the settings in `config_file`.
///
/// Logs in, creates the task and logs out again. Once logged in the logout
/// is attempted even if creating the task failed. Returns `true` only if all
/// three steps succeeded, every failure is logged.
pub async fn send_url(add_url: &str, config_file: &str) -> bool {
    debug!("Using config file: {config_file}");
    debug!("Adding url: {add_url}");

    match try_send_url(add_url, config_file).await {
        Ok(()) => true,
        Err(e) => {
            error!("{e:#}");
            false
        }
    }
}

async fn try_send_url(add_url: &str, config_file: &str) -> Result<()> {
    let (username, host, password) = read_config(config_file)?.require()?;

    let upload = match DownloadTarget::classify(add_url) {
        DownloadTarget::Uri(uri) => Upload::Uri(uri),
        DownloadTarget::File(path) => Upload::File(FileUpload::read(&path)?),
    };

    let mut synods = SynoDS::builder()
        .host(host)
        .username(username)
        .password(password)
        .build()?;

    synods.login().await?;

    let created = match &upload {
        Upload::Uri(uri) => synods.create_task(uri).await,
        Upload::File(file) => synods.create_task_from_file(&file.data, &file.name).await,
    };
    let logged_out = synods.logout().await;

    match (created, logged_out) {
        (Err(e), Err(logout_error)) => {
            error!("{logout_error:#}");
            Err(e)
        }
        (created, logged_out) => created.and(logged_out),
    }
}

enum Upload {
    Uri(String),
    File(FileUpload),
}
