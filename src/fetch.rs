// src/fetch.rs - Retrieve a remote archive into local storage

use crate::error::DownloadError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

const FALLBACK_FILE_NAME: &str = "download.gz";

/// Last non-empty path segment of `url`, without query or fragment
pub fn file_name_from_url(url: &str) -> String {
    let without_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);

    without_query
        .split_once('/')
        .and_then(|(_, path)| path.rsplit('/').find(|segment| !segment.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Stream `url` into `dest_dir`, returning the saved path.
///
/// The body is written to a `.part` file first and renamed once complete.
pub fn download(url: &str, dest_dir: &Path) -> Result<PathBuf, DownloadError> {
    fs::create_dir_all(dest_dir).map_err(|source| DownloadError::Io {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let target = dest_dir.join(file_name_from_url(url));
    let partial = target.with_extension("part");

    info!(url, target = %target.display(), "downloading");
    let started = Instant::now();

    let response = ureq::get(url).call().map_err(|err| match err {
        ureq::Error::StatusCode(code) => DownloadError::Status {
            url: url.to_string(),
            code,
        },
        other => DownloadError::Request {
            url: url.to_string(),
            message: other.to_string(),
        },
    })?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(DownloadError::Status {
            url: url.to_string(),
            code: status,
        });
    }

    let mut reader = response.into_body().into_reader();
    let mut file = File::create(&partial).map_err(|source| DownloadError::Io {
        path: partial.clone(),
        source,
    })?;
    let bytes = io::copy(&mut reader, &mut file).map_err(|source| {
        let _ = fs::remove_file(&partial);
        DownloadError::Io {
            path: partial.clone(),
            source,
        }
    })?;
    drop(file);

    fs::rename(&partial, &target).map_err(|source| DownloadError::Io {
        path: target.clone(),
        source,
    })?;

    info!(
        bytes,
        elapsed = %humantime::format_duration(Duration::from_millis(started.elapsed().as_millis() as u64)),
        "download complete"
    );
    Ok(target)
}
