use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Runtime configuration of the dashboard.
///
/// There is deliberately no environment or CLI layer: the data file lives at
/// a fixed relative path and the only deployment-specific value, the device
/// address, can be changed in the side panel.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the sensor's web server.
    pub device_url: String,

    /// Where the downloaded CSV log is stored.
    pub data_file: PathBuf,

    /// Timeout applied to every device request.
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            device_url: "http://192.168.178.157".to_string(),
            data_file: PathBuf::from("esp32_data.csv"),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// URL of the CSV log download endpoint.
    pub fn download_url(&self) -> String {
        format!("{}/download", self.device_url.trim_end_matches('/'))
    }

    /// URL of the live sensor snapshot endpoint.
    pub fn live_data_url(&self) -> String {
        format!("{}/api/data", self.device_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_tolerate_trailing_slash() {
        let mut config = AppConfig::default();
        config.device_url = "http://esp32soilsensor.local/".to_string();
        assert_eq!(
            config.download_url(),
            "http://esp32soilsensor.local/download"
        );
        assert_eq!(
            config.live_data_url(),
            "http://esp32soilsensor.local/api/data"
        );
    }
}
