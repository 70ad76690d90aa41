use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) if val.trim().is_empty() => None,
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Parse a comma-separated env var into trimmed, non-empty items.
fn parse_env_list(var: &str, default: &[&str]) -> Vec<String> {
    match env::var(var) {
        Ok(val) => val
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|item| item.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub ocr: OcrConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Bearer token verification settings.
///
/// A request is accepted when its token equals `debug_token`, or when it is a
/// JWT signed by a key from the issuer's JWKS document.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub debug_token: Option<String>,
    /// Base URL of the token issuer, e.g. `https://<project>.supabase.co`.
    pub issuer_url: Option<String>,
    /// Overrides the JWKS location derived from `issuer_url`.
    pub jwks_url: Option<String>,
    pub audience: String,
    pub timeout_secs: u64,
}

impl AuthConfig {
    /// Expected `iss` claim for tokens minted by the issuer.
    pub fn expected_issuer(&self) -> Option<String> {
        self.issuer_url
            .as_deref()
            .map(|url| format!("{}/auth/v1", url.trim_end_matches('/')))
    }

    pub fn resolved_jwks_url(&self) -> Option<String> {
        self.jwks_url.clone().or_else(|| {
            self.expected_issuer()
                .map(|issuer| format!("{issuer}/.well-known/jwks.json"))
        })
    }

    /// False when neither a debug token nor a key set is configured, in
    /// which case every bearer token is rejected.
    pub fn can_verify_tokens(&self) -> bool {
        self.debug_token.is_some() || self.resolved_jwks_url().is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub cloud: CloudVisionConfig,
    pub neural: NeuralOcrConfig,
    pub tesseract: TesseractConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudVisionConfig {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub base_url: Option<String>,
    /// Empty means the service auto-detects the language.
    pub language_hints: Vec<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NeuralOcrConfig {
    pub executable: PathBuf,
    pub languages: Vec<String>,
    pub gpu: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TesseractConfig {
    pub binary: PathBuf,
    pub lang: String,
    /// Tesseract page segmentation mode (`--psm`).
    pub psm: u8,
    pub tessdata_dir: Option<PathBuf>,
    /// Words below this confidence (0-100) are ignored.
    pub min_confidence: f64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub level: String,
    pub console: bool,
    /// Rotated files kept per component.
    pub max_files: usize,
}

impl Default for CloudVisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            base_url: None,
            language_hints: Vec::new(),
            timeout_secs: 60,
        }
    }
}

impl Default for NeuralOcrConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("PaddleOCR-json"),
            languages: vec!["en".to_string()],
            gpu: false,
            timeout_secs: 120,
        }
    }
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            lang: "eng".to_string(),
            psm: 3,
            tessdata_dir: None,
            min_confidence: 0.0,
            timeout_secs: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            console: true,
            max_files: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("OCRBENCH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("OCRBENCH_PORT", 8000),
            },
            auth: AuthConfig {
                debug_token: parse_env_opt("DEBUG_TOKEN"),
                issuer_url: parse_env_opt("AUTH_ISSUER_URL"),
                jwks_url: parse_env_opt("AUTH_JWKS_URL"),
                audience: env::var("AUTH_AUDIENCE")
                    .unwrap_or_else(|_| "authenticated".to_string()),
                timeout_secs: parse_env_or("AUTH_TIMEOUT", 10),
            },
            ocr: OcrConfig {
                cloud: CloudVisionConfig {
                    api_key: parse_env_opt("VISION_API_KEY"),
                    access_token: parse_env_opt("VISION_ACCESS_TOKEN"),
                    base_url: parse_env_opt("VISION_BASE_URL"),
                    language_hints: parse_env_list("VISION_LANGUAGE_HINTS", &[]),
                    timeout_secs: parse_env_or("VISION_TIMEOUT", 60),
                },
                neural: NeuralOcrConfig {
                    executable: parse_env_or("NEURAL_OCR_PATH", PathBuf::from("PaddleOCR-json")),
                    languages: parse_env_list("NEURAL_OCR_LANGUAGES", &["en"]),
                    gpu: parse_env_or("NEURAL_OCR_GPU", false),
                    timeout_secs: parse_env_or("NEURAL_OCR_TIMEOUT", 120),
                },
                tesseract: TesseractConfig {
                    binary: parse_env_or("TESSERACT_PATH", PathBuf::from("tesseract")),
                    lang: env::var("TESSERACT_LANG").unwrap_or_else(|_| "eng".to_string()),
                    psm: parse_env_or("TESSERACT_PSM", 3),
                    tessdata_dir: parse_env_opt("TESSERACT_DATA_DIR"),
                    min_confidence: parse_env_or("TESSERACT_MIN_CONFIDENCE", 0.0),
                    timeout_secs: parse_env_or("TESSERACT_TIMEOUT", 60),
                },
            },
            output: OutputConfig {
                dir: parse_env_or("OCR_OUTPUT_DIR", PathBuf::from("ocr_results")),
            },
            logging: LoggingConfig {
                dir: parse_env_or("LOG_DIR", PathBuf::from("logs")),
                level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                console: parse_env_or("LOG_CONSOLE", true),
                max_files: parse_env_or("LOG_MAX_FILES", 10),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
