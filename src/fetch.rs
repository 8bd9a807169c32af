use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Device HTTP client
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("device returned HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("writing '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("decoding live data: {0}")]
    Decode(#[from] serde_json::Error),
}

fn client(timeout: Duration) -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Download the device's CSV log to `destination`.
///
/// One blocking GET, no retries. Success requires HTTP 200 exactly; any
/// other status aborts with the response discarded. The body is streamed
/// byte-for-byte into a `.part` sibling and renamed onto `destination` only
/// once fully written, so a failed download never leaves a torn log and the
/// previous one stays readable.
///
/// Returns the number of bytes written.
pub fn download_csv(url: &str, destination: &Path, timeout: Duration) -> Result<u64, FetchError> {
    let mut response = client(timeout)?.get(url).send()?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status));
    }

    let tmp = part_path(destination);
    match stream_to_file(&mut response, &tmp) {
        Ok(bytes) => match fs::rename(&tmp, destination) {
            Ok(()) => {
                log::info!("downloaded {bytes} bytes to '{}'", destination.display());
                Ok(bytes)
            }
            Err(source) => {
                let _ = fs::remove_file(&tmp);
                Err(FetchError::Io {
                    path: destination.to_path_buf(),
                    source,
                })
            }
        },
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn stream_to_file(response: &mut Response, path: &Path) -> Result<u64, FetchError> {
    let mut file = File::create(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = response.copy_to(&mut file)?;
    Ok(bytes)
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "download".into());
    name.push(".part");
    destination.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Live snapshot
// ---------------------------------------------------------------------------

/// Current sensor values as served by the firmware's `/api/data` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveReading {
    pub soil_raw: i64,
    /// Soil status label assigned by the firmware ("trocken", "feucht", …).
    pub status: String,
    pub light_raw: i64,
    pub irradiance: f64,
    pub temperature: f64,
    pub humidity: f64,
}

/// Fetch the device's live sensor snapshot.
pub fn fetch_live(url: &str, timeout: Duration) -> Result<LiveReading, FetchError> {
    let response = client(timeout)?.get(url).send()?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status));
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// One-shot loopback HTTP server for exercising the client offline.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let header = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(header.as_bytes());
                let _ = stream.write_all(body);
            }
        });
        format!("http://{addr}")
    }

    #[test]
    fn download_round_trips_the_body_byte_for_byte() {
        let body: &[u8] = "Zeitstempel,Licht-Rohwert\n2024-06-15 09:00:00,2047\n".as_bytes();
        let url = serve_once("200 OK", body);

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("esp32_data.csv");
        let bytes = download_csv(&url, &dest, TIMEOUT).unwrap();

        assert_eq!(bytes, body.len() as u64);
        assert_eq!(fs::read(&dest).unwrap(), body);
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn non_ok_status_is_an_error_and_writes_nothing() {
        let url = serve_once("404 Not Found", b"Datei nicht gefunden");

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("esp32_data.csv");
        match download_csv(&url, &dest, TIMEOUT) {
            Err(FetchError::HttpStatus(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn failed_download_keeps_the_previous_log() {
        let url = serve_once("500 Internal Server Error", b"");

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("esp32_data.csv");
        fs::write(&dest, "old log contents").unwrap();

        assert!(download_csv(&url, &dest, TIMEOUT).is_err());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old log contents");
    }

    #[test]
    fn unreachable_device_is_a_network_error() {
        // Grab a free port, then close the listener before connecting.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("esp32_data.csv");
        match download_csv(&format!("http://{addr}"), &dest, TIMEOUT) {
            Err(FetchError::Network(_)) => {}
            other => panic!("expected Network, got {other:?}"),
        }
        assert!(!dest.exists());
    }

    #[test]
    fn live_snapshot_decodes_firmware_field_names() {
        let url = serve_once(
            "200 OK",
            br#"{"soilRaw":1800,"status":"feucht","lightRaw":2047,"irradiance":500.1,"temperature":22.5,"humidity":58.1}"#,
        );

        let live = fetch_live(&url, TIMEOUT).unwrap();
        assert_eq!(live.soil_raw, 1800);
        assert_eq!(live.status, "feucht");
        assert_eq!(live.light_raw, 2047);
        assert!((live.irradiance - 500.1).abs() < f64::EPSILON);
        assert!((live.temperature - 22.5).abs() < f64::EPSILON);
        assert!((live.humidity - 58.1).abs() < f64::EPSILON);
    }
}
