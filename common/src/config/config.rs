use anyhow::Context;
use config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub sys: Option<SysConfig>,
    pub supabase: Option<SupabaseConfig>,
    pub upload: Option<UploadConfig>,
    pub storage: Option<StorageConfig>,
    #[serde(default)]
    pub dev_users: Vec<DevUserConfig>,
}

impl AppConfig {
    pub fn new(file: &str) -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(config::File::with_name(file).required(true))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()
            .with_context(|| format!("failed to build configuration from {file}"))?;
        let cfg = config.try_deserialize::<AppConfig>().context("failed to deserialize configuration")?;
        Ok(cfg)
    }

    pub fn init(file: &str) -> anyhow::Result<()> {
        let instance = Self::new(file)?;
        INSTANCE.set(Arc::new(instance)).map_err(|_| anyhow::anyhow!("AppConfig already initialized"))
    }

    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_supabase(&self) -> SupabaseConfig {
        self.supabase.clone().unwrap_or_default()
    }
    pub fn get_upload(&self) -> UploadConfig {
        self.upload.clone().unwrap_or_default()
    }
    pub fn get_storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    /// Process-wide instance; panics when `init` has not run.
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("AppConfig is not initialized").clone()
    }
}
static INSTANCE: OnceCell<Arc<AppConfig>> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SysConfig {
    pub log_level: String,
}
impl Default for SysConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string() }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project base url, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public key, used for auth calls made on behalf of a user.
    pub anon_key: String,
    /// Service-role key, used for row and storage writes.
    pub service_role_key: String,
    pub bucket: String,
    /// Per remote call.
    pub timeout_secs: u64,
}
impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            service_role_key: String::new(),
            bucket: "client-files".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub max_files: usize,
    /// Bytes, per file part.
    pub max_file_size: usize,
}
impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_files: 5, max_file_size: 10 * 1024 * 1024 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Supabase,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Account served by the memory backend. Ignored for `supabase`.
#[derive(Debug, Deserialize, Clone)]
pub struct DevUserConfig {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get_upload().max_files, 5);
        assert_eq!(cfg.get_upload().max_file_size, 10 * 1024 * 1024);
        assert_eq!(cfg.get_supabase().bucket, "client-files");
        assert_eq!(cfg.get_storage().backend, StorageBackend::Supabase);
        assert_eq!(cfg.get_server().port, 8080);
    }

    #[test]
    fn storage_backend_reads_snake_case() {
        let cfg = Config::builder()
            .add_source(config::File::from_str(
                "[storage]\nbackend = \"memory\"\n[upload]\nmax_files = 3\nmax_file_size = 1024\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        assert_eq!(cfg.get_storage().backend, StorageBackend::Memory);
        assert_eq!(cfg.get_upload().max_files, 3);
        assert!(cfg.dev_users.is_empty());
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let cfg = Config::builder()
            .add_source(config::File::from_str("[supabase]\nurl = \"https://x.supabase.co\"\n", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<AppConfig>()
            .unwrap();
        let supabase = cfg.get_supabase();
        assert_eq!(supabase.url, "https://x.supabase.co");
        assert_eq!(supabase.bucket, "client-files");
        assert_eq!(supabase.timeout_secs, 30);
    }
}
