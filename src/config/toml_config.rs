use crate::adapters::InMemoryCatalog;
use crate::core::ledger::DEFAULT_RETENTION_SECONDS;
use crate::core::persistence::{CartPersistence, DEFAULT_CART_KEY, DEFAULT_LEDGER_KEY};
use crate::core::pricing::{PricingPolicy, DEFAULT_BULK_THRESHOLD};
use crate::core::session::SessionSettings;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{self, Validate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 保留視窗上限：一天
pub const MAX_RETENTION_SECONDS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub cart: CartConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub cart_key: String,
    pub ledger_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./.storefront".to_string(),
            cart_key: DEFAULT_CART_KEY.to_string(),
            ledger_key: DEFAULT_LEDGER_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    pub retention_seconds: i64,
    pub bulk_discount_threshold: u32,
    pub bulk_discount_rate: f64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            retention_seconds: DEFAULT_RETENTION_SECONDS,
            bulk_discount_threshold: DEFAULT_BULK_THRESHOLD,
            bulk_discount_rate: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// 內建商品清單
    #[default]
    Seed,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: CatalogKind,
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CART_DATA_DIR})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> String {
        let re = env_var_pattern();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_storage_key("storage.cart_key", &self.storage.cart_key)?;
        validation::validate_storage_key("storage.ledger_key", &self.storage.ledger_key)?;

        if self.storage.cart_key == self.storage.ledger_key {
            return Err(CartError::InvalidConfigValueError {
                field: "storage.ledger_key".to_string(),
                value: self.storage.ledger_key.clone(),
                reason: "Must differ from storage.cart_key".to_string(),
            });
        }

        validation::validate_range(
            "cart.retention_seconds",
            self.cart.retention_seconds,
            1,
            MAX_RETENTION_SECONDS,
        )?;
        validation::validate_positive_number(
            "cart.bulk_discount_threshold",
            i64::from(self.cart.bulk_discount_threshold),
            1,
        )?;
        validation::validate_range("cart.bulk_discount_rate", self.cart.bulk_discount_rate, 0.0, 1.0)?;

        if self.catalog.source == CatalogKind::File {
            let path = validation::validate_required_field("catalog.path", &self.catalog.path)?;
            validation::validate_path("catalog.path", path)?;
            validation::validate_file_extension("catalog.path", path, &["json"])?;
        }

        Ok(())
    }

    /// 取得資料目錄
    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    pub fn pricing_policy(&self) -> Result<PricingPolicy> {
        let rate = Decimal::from_f64(self.cart.bulk_discount_rate).ok_or_else(|| {
            CartError::InvalidConfigValueError {
                field: "cart.bulk_discount_rate".to_string(),
                value: self.cart.bulk_discount_rate.to_string(),
                reason: "Not a finite number".to_string(),
            }
        })?;
        Ok(PricingPolicy::with_discount_rate(
            self.cart.bulk_discount_threshold,
            rate,
        ))
    }

    pub fn session_settings(&self) -> Result<SessionSettings> {
        let retention = chrono::Duration::try_seconds(self.cart.retention_seconds).ok_or_else(|| {
            CartError::InvalidConfigValueError {
                field: "cart.retention_seconds".to_string(),
                value: self.cart.retention_seconds.to_string(),
                reason: "Out of range for a duration".to_string(),
            }
        })?;
        Ok(SessionSettings {
            persistence: CartPersistence::new(&self.storage.cart_key, &self.storage.ledger_key),
            retention,
            pricing: self.pricing_policy()?,
        })
    }

    pub fn load_catalog(&self) -> Result<InMemoryCatalog> {
        match (self.catalog.source, &self.catalog.path) {
            (CatalogKind::File, Some(path)) => InMemoryCatalog::from_file(path),
            (CatalogKind::File, None) => Err(CartError::MissingConfigError {
                field: "catalog.path".to_string(),
            }),
            (CatalogKind::Seed, _) => InMemoryCatalog::seeded(),
        }
    }
}

fn env_var_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
    })
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.storage.cart_key, DEFAULT_CART_KEY);
        assert_eq!(config.cart.retention_seconds, 300);
        assert_eq!(config.catalog.source, CatalogKind::Seed);
        assert!(config.validate().is_ok());
        assert_eq!(config.pricing_policy().unwrap(), PricingPolicy::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[storage]
data_dir = "/var/lib/storefront"
cart_key = "cart"
ledger_key = "removed"

[cart]
retention_seconds = 120
bulk_discount_threshold = 3
bulk_discount_rate = 0.25

[catalog]
source = "file"
path = "products.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.data_dir(), "/var/lib/storefront");

        let settings = config.session_settings().unwrap();
        assert_eq!(settings.persistence, CartPersistence::new("cart", "removed"));
        assert_eq!(settings.retention, chrono::Duration::seconds(120));
        assert_eq!(settings.pricing.bulk_threshold, 3);
        assert_eq!(settings.pricing.bulk_multiplier, Decimal::new(75, 2));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STOREFRONT_TEST_DATA_DIR", "/tmp/storefront-test");

        let toml_content = r#"
[storage]
data_dir = "${STOREFRONT_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.data_dir, "/tmp/storefront-test");

        std::env::remove_var("STOREFRONT_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let same_keys = TomlConfig::from_toml_str(
            r#"
[storage]
cart_key = "cart"
ledger_key = "cart"
"#,
        )
        .unwrap();
        assert!(same_keys.validate().is_err());

        let bad_rate = TomlConfig::from_toml_str("[cart]\nbulk_discount_rate = 1.5\n").unwrap();
        assert!(bad_rate.validate().is_err());

        let no_window = TomlConfig::from_toml_str("[cart]\nretention_seconds = 0\n").unwrap();
        assert!(no_window.validate().is_err());

        let missing_path = TomlConfig::from_toml_str("[catalog]\nsource = \"file\"\n").unwrap();
        assert!(matches!(
            missing_path.validate(),
            Err(CartError::MissingConfigError { .. })
        ));
        assert!(missing_path.load_catalog().is_err());
    }

    #[test]
    fn test_retention_upper_bound() {
        let huge = TomlConfig::from_toml_str("[cart]\nretention_seconds = 9223372036854775807\n")
            .unwrap();
        assert!(matches!(
            huge.validate(),
            Err(CartError::InvalidConfigValueError { .. })
        ));
        assert!(matches!(
            huge.session_settings(),
            Err(CartError::InvalidConfigValueError { .. })
        ));

        let one_day = TomlConfig::from_toml_str("[cart]\nretention_seconds = 86400\n").unwrap();
        assert!(one_day.validate().is_ok());
        assert_eq!(
            one_day.session_settings().unwrap().retention,
            chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[cart\nretention_seconds = 1"),
            Err(CartError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"./cart-data\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "./cart-data");
        assert_eq!(config.load_catalog().unwrap().len(), 10);
    }
}
