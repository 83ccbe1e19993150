//! Configuration and wiring for sixcities.

use anyhow::{Context, Result};
use rental_client::{ActionContext, ClientConfig, FileSessionStore, HttpTransport, Store};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    /// Orchestrator context.
    pub actions: ActionContext,
    /// Effective configuration (file + flags).
    pub config: ClientConfig,
    /// Where the session token lives.
    pub token_path: PathBuf,
}

impl AppContext {
    /// Load `config.toml` from `data_dir`, apply flag overrides and wire the
    /// store, file session and HTTP transport together.
    pub async fn load(data_dir: &Path, base_url: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::load_or_default(&data_dir.join(CONFIG_FILE)).await?;
        if let Some(url) = base_url {
            config.api.base_url = url.to_string();
        }

        let token_path = config.session.token_path(data_dir);
        let session = Arc::new(FileSessionStore::new(&token_path));
        let transport = HttpTransport::from_config(&config.api, session.clone())
            .context("Failed to create HTTP client")?;
        tracing::debug!("Using API at {}", transport.base_url());

        let store = Arc::new(Store::new(config.ui.initial_state()));
        let actions = ActionContext::new(store, Arc::new(transport), session)
            .with_error_clear_delay(config.ui.error_clear_delay());

        Ok(Self {
            actions,
            config,
            token_path,
        })
    }
}

/// Get the default data directory for sixcities.
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "six-cities", "sixcities")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Set directory permissions to 0700 (owner only) on Unix.
/// No-op on non-Unix platforms.
pub async fn set_dir_permissions_0700(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
            .await
            .context("Failed to set directory permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
