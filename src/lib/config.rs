//! Build-time configuration for the API host and detection model sources with an
//! optional runtime override. The runtime config is read from
//! `window.FACEGATE_CONFIG` (if present) so static deployments can change
//! endpoints without rebuilding. Configuration values are public; do not store
//! secrets here.

/// Default request timeout (milliseconds) applied by the browser transport.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;
/// Local path the detection model weights are served from.
pub const DEFAULT_MODELS_PATH: &str = "/models";
/// Public mirror used when the local model weights cannot be loaded.
pub const DEFAULT_MODELS_FALLBACK_URL: &str =
    "https://raw.githubusercontent.com/justadudewhohacks/face-api.js/master/weights";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub models_path: String,
    pub models_fallback_url: String,
    pub log_level: String,
    pub request_timeout_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            models_path: DEFAULT_MODELS_PATH.to_string(),
            models_fallback_url: DEFAULT_MODELS_FALLBACK_URL.to_string(),
            log_level: "info".to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    pub fn load() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            api_base_url: option_env!("FACEGATE_API_BASE_URL")
                .unwrap_or("")
                .to_string(),
            models_path: option_env!("FACEGATE_MODELS_PATH")
                .and_then(normalize_runtime_value)
                .unwrap_or(defaults.models_path),
            models_fallback_url: option_env!("FACEGATE_MODELS_FALLBACK_URL")
                .and_then(normalize_runtime_value)
                .unwrap_or(defaults.models_fallback_url),
            log_level: option_env!("FACEGATE_LOG_LEVEL")
                .and_then(normalize_runtime_value)
                .unwrap_or(defaults.log_level),
            request_timeout_ms: option_env!("FACEGATE_REQUEST_TIMEOUT_MS")
                .and_then(parse_timeout)
                .unwrap_or(defaults.request_timeout_ms),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Model sources in load order: the local path first, then the public mirror.
    pub fn model_sources(&self) -> Vec<String> {
        let mut sources = vec![self.models_path.clone()];
        if self.models_fallback_url != self.models_path {
            sources.push(self.models_fallback_url.clone());
        }
        sources
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    models_path: Option<String>,
    models_fallback_url: Option<String>,
    log_level: Option<String>,
    request_timeout_ms: Option<u32>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.models_path {
        config.models_path = value;
    }
    if let Some(value) = runtime.models_fallback_url {
        config.models_fallback_url = value;
    }
    if let Some(value) = runtime.log_level {
        config.log_level = value;
    }
    if let Some(value) = runtime.request_timeout_ms {
        config.request_timeout_ms = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("FACEGATE_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        models_path: read_runtime_value(&object, "models_path"),
        models_fallback_url: read_runtime_value(&object, "models_fallback_url"),
        log_level: read_runtime_value(&object, "log_level"),
        request_timeout_ms: read_runtime_value(&object, "request_timeout_ms")
            .as_deref()
            .and_then(parse_timeout),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key)).ok()?;
    let text = value
        .as_string()
        .or_else(|| value.as_f64().map(|number| number.to_string()))?;
    normalize_runtime_value(&text)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_timeout(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|millis| *millis > 0)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, RuntimeConfig, apply_runtime_overrides, normalize_runtime_value, parse_timeout};

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.facegate.dev "),
            Some("https://api.facegate.dev".to_string())
        );
    }

    #[test]
    fn parse_timeout_rejects_zero_and_garbage() {
        assert_eq!(parse_timeout("2500"), Some(2500));
        assert_eq!(parse_timeout(" 0 "), None);
        assert_eq!(parse_timeout("soon"), None);
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = AppConfig {
            api_base_url: "https://api.default".to_string(),
            ..AppConfig::default()
        };
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value(""),
            models_path: normalize_runtime_value("  "),
            ..RuntimeConfig::default()
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.default");
        assert_eq!(config.models_path, "/models");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = AppConfig::default();
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override"),
            models_path: normalize_runtime_value("/static/weights"),
            models_fallback_url: normalize_runtime_value("https://cdn.override/weights"),
            log_level: normalize_runtime_value("debug"),
            request_timeout_ms: parse_timeout("3000"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override");
        assert_eq!(config.models_path, "/static/weights");
        assert_eq!(config.models_fallback_url, "https://cdn.override/weights");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout_ms, 3000);
    }

    #[test]
    fn model_sources_put_local_path_first() {
        let config = AppConfig::default();
        assert_eq!(
            config.model_sources(),
            vec![
                "/models".to_string(),
                super::DEFAULT_MODELS_FALLBACK_URL.to_string()
            ]
        );
    }

    #[test]
    fn model_sources_skip_duplicate_fallback() {
        let config = AppConfig {
            models_fallback_url: "/models".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.model_sources(), vec!["/models".to_string()]);
    }
}
