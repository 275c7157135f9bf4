use anyhow::Context;
use protocol::config::QjConfig;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use system_utils::path::{default_config_path, expand_tilde};

pub(crate) fn resolve_config_path(cli_value: Option<&Path>) -> anyhow::Result<PathBuf> {
    match cli_value {
        Some(path) => Ok(expand_tilde(path)),
        None => default_config_path(),
    }
}

/// Creates `path` with the example config when it does not exist yet.
/// Returns whether the file was created.
pub(crate) fn ensure_config_file(path: &Path) -> anyhow::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let example = toml::to_string_pretty(&QjConfig::example())
        .context("failed to encode example config")?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to create {}", path.display()))
        }
    };
    file.write_all(example.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)?;
    }
    tracing::info!(path = %path.display(), "created example config");
    Ok(true)
}

/// A freshly created config is reported as an error so the user fills it in
/// before any request is made.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<QjConfig> {
    if ensure_config_file(path)? {
        anyhow::bail!(
            "config file not found, created a default in {}",
            path.display()
        );
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: QjConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &QjConfig) -> anyhow::Result<()> {
    let problems = config.problems();
    if problems.is_empty() {
        return Ok(());
    }
    let mut message = String::from("errors were found in your config file:");
    for problem in problems {
        message.push_str("\n  - ");
        message.push_str(&problem);
    }
    Err(anyhow::Error::msg(message))
}
