use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub survey_api: SurveyApiConfig,
    pub layers: LayersConfig,
    pub map: MapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// KoboToolbox form-collection API settings
#[derive(Debug, Clone)]
pub struct SurveyApiConfig {
    /// Base URL of the Kobo server (without trailing slash)
    pub base_url: String,
    /// Form asset UID whose submissions are fetched
    pub asset_uid: String,
    /// API token sent as `Authorization: Token <token>`
    pub token: Option<String>,
}

/// Locations of the static reference layers
#[derive(Debug, Clone)]
pub struct LayersConfig {
    pub peatland_url: String,
    pub protected_areas_url: String,
    pub deforestation_raster_url: String,
    pub deforestation_wms_url: String,
    pub deforestation_wms_layer: String,
    /// Sample the deforestation raster when classifying survey points
    pub deforestation_classification: bool,
}

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub tile_url: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            survey_api: SurveyApiConfig::from_env()?,
            layers: LayersConfig::from_env()?,
            map: MapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SurveyApiConfig {
    const DEFAULT_BASE_URL: &'static str = "https://kf.kobotoolbox.org";
    const DEFAULT_ASSET_UID: &'static str = "aNkj5BVuLuqGfqustJMNaM";

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("KOBO_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let asset_uid =
            env::var("KOBO_ASSET_UID").unwrap_or_else(|_| Self::DEFAULT_ASSET_UID.to_string());
        if asset_uid.trim().is_empty() {
            return Err("KOBO_ASSET_UID must not be empty".to_string());
        }

        let token = env::var("KOBO_TOKEN").ok().filter(|s| !s.is_empty());

        Ok(Self {
            base_url,
            asset_uid,
            token,
        })
    }

    /// Submission data endpoint for the configured asset
    pub fn data_url(&self) -> String {
        format!(
            "{}/api/v2/assets/{}/data.json/",
            self.base_url, self.asset_uid
        )
    }
}

impl LayersConfig {
    const DEFAULT_PEATLAND_URL: &'static str = "https://github.com/rizkaameliads/traceability-mockup-dashplotly/raw/refs/heads/main/assets/INDONESIA%20PEATLAND%202017.zip";
    const DEFAULT_PROTECTED_AREAS_URL: &'static str = "https://github.com/rizkaameliads/traceability-mockup-dashplotly/raw/refs/heads/main/assets/Protected_Areas_Generalized.zip";
    const DEFAULT_DEFORESTATION_RASTER_URL: &'static str = "https://github.com/rizkaameliads/traceability-mockup-dashplotly/raw/refs/heads/main/assets/Deforestation_Year_TMF.tif";
    const DEFAULT_WMS_URL: &'static str = "https://ies-ows.jrc.ec.europa.eu/iforce/tmf_v1/wms.py?";
    const DEFAULT_WMS_LAYER: &'static str = "DeforestationYear";

    pub fn from_env() -> Result<Self, String> {
        let peatland_url =
            env::var("PEATLAND_URL").unwrap_or_else(|_| Self::DEFAULT_PEATLAND_URL.to_string());
        let protected_areas_url = env::var("PROTECTED_AREAS_URL")
            .unwrap_or_else(|_| Self::DEFAULT_PROTECTED_AREAS_URL.to_string());
        let deforestation_raster_url = env::var("DEFORESTATION_RASTER_URL")
            .unwrap_or_else(|_| Self::DEFAULT_DEFORESTATION_RASTER_URL.to_string());
        let deforestation_wms_url =
            env::var("DEFORESTATION_WMS_URL").unwrap_or_else(|_| Self::DEFAULT_WMS_URL.to_string());
        let deforestation_wms_layer = env::var("DEFORESTATION_WMS_LAYER")
            .unwrap_or_else(|_| Self::DEFAULT_WMS_LAYER.to_string());

        let deforestation_classification = env::var("DEFORESTATION_CLASSIFICATION_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|_| "DEFORESTATION_CLASSIFICATION_ENABLED must be true or false".to_string())?;

        Ok(Self {
            peatland_url,
            protected_areas_url,
            deforestation_raster_url,
            deforestation_wms_url,
            deforestation_wms_layer,
            deforestation_classification,
        })
    }
}

impl MapConfig {
    const DEFAULT_CENTER_LAT: f64 = -4.0;
    const DEFAULT_CENTER_LON: f64 = 118.79907798885809;
    const DEFAULT_ZOOM: u8 = 4;
    const DEFAULT_TILE_URL: &'static str =
        "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";

    pub fn from_env() -> Result<Self, String> {
        let center_lat = env::var("MAP_CENTER_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LAT must be a valid number".to_string())?;

        let center_lon = env::var("MAP_CENTER_LON")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LON.to_string())
            .parse::<f64>()
            .map_err(|_| "MAP_CENTER_LON must be a valid number".to_string())?;

        let zoom = env::var("MAP_ZOOM")
            .unwrap_or_else(|_| Self::DEFAULT_ZOOM.to_string())
            .parse::<u8>()
            .map_err(|_| "MAP_ZOOM must be a valid number".to_string())?;

        let tile_url =
            env::var("MAP_TILE_URL").unwrap_or_else(|_| Self::DEFAULT_TILE_URL.to_string());

        Ok(Self {
            center_lat,
            center_lon,
            zoom,
            tile_url,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Traceability Dashboard API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Farm survey traceability against land-use layers".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_data_url() {
        let config = SurveyApiConfig {
            base_url: "https://kf.kobotoolbox.org".to_string(),
            asset_uid: "abc123".to_string(),
            token: None,
        };
        assert_eq!(
            config.data_url(),
            "https://kf.kobotoolbox.org/api/v2/assets/abc123/data.json/"
        );
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut config = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(config.credentials(), None);

        config.password = Some("secret".to_string());
        assert_eq!(config.credentials(), Some("admin:secret".to_string()));
    }
}
