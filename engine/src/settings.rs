//! Persistent key-value settings for ghosttype.
//!
//! Backed by `$GHOSTTYPE_HOME/config.toml` (default `~/.ghosttype/config.toml`).
//! Reads tolerate a missing file; writes go through `toml_edit` so comments and
//! formatting in a hand-edited file survive, and land atomically via a temp
//! file in the same directory. The engine only reads these values; writing is
//! the province of the `ghosttype settings` commands.

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use tempfile::NamedTempFile;
use toml_edit::DocumentMut;
use toml_edit::Item as TomlItem;
use toml_edit::value;

use crate::provider::Tone;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store rooted at `$GHOSTTYPE_HOME`, falling back to `~/.ghosttype`.
    pub fn new_default() -> anyhow::Result<Self> {
        Ok(Self::new(ghosttype_home()?.join("config.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// OpenAI API credential, if one has been configured.
    pub fn api_key(&self) -> anyhow::Result<Option<String>> {
        Ok(self
            .read_string("api_key")?
            .filter(|key| !key.trim().is_empty()))
    }

    /// Configured tone, defaulting to Casual when absent. An unknown stored
    /// value also falls back to Casual rather than failing startup.
    pub fn tone(&self) -> anyhow::Result<Tone> {
        let Some(raw) = self.read_string("tone")? else {
            return Ok(Tone::default());
        };
        match Tone::parse(&raw) {
            Some(tone) => Ok(tone),
            None => {
                tracing::warn!("unknown tone `{raw}` in settings, using Casual");
                Ok(Tone::default())
            }
        }
    }

    pub fn model(&self) -> anyhow::Result<String> {
        Ok(self
            .read_string("model")?
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()))
    }

    pub fn set_api_key(&self, key: &str) -> anyhow::Result<()> {
        self.write_value("api_key", key)
    }

    pub fn set_tone(&self, tone: Tone) -> anyhow::Result<()> {
        self.write_value("tone", &tone.to_string())
    }

    pub fn set_model(&self, model: &str) -> anyhow::Result<()> {
        self.write_value("model", model)
    }

    fn read_string(&self, key: &str) -> anyhow::Result<Option<String>> {
        let Some(content) = read_document_string(&self.path)? else {
            return Ok(None);
        };
        let doc = content
            .parse::<DocumentMut>()
            .with_context(|| format!("parse settings file {}", self.path.display()))?;
        Ok(doc
            .get(key)
            .and_then(TomlItem::as_value)
            .and_then(|v| v.as_str())
            .map(ToOwned::to_owned))
    }

    fn write_value(&self, key: &str, raw: &str) -> anyhow::Result<()> {
        let content = read_document_string(&self.path)?.unwrap_or_default();
        let mut doc = content
            .parse::<DocumentMut>()
            .with_context(|| format!("parse settings file {}", self.path.display()))?;
        doc[key] = value(raw);
        write_atomic_text(&self.path, &doc.to_string())
    }
}

fn ghosttype_home() -> anyhow::Result<PathBuf> {
    if let Ok(val) = std::env::var("GHOSTTYPE_HOME")
        && !val.is_empty()
    {
        return Ok(PathBuf::from(val));
    }
    let Some(home) = dirs::home_dir() else {
        anyhow::bail!("cannot determine home directory for the settings path");
    };
    Ok(home.join(".ghosttype"))
}

fn read_document_string(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("read settings file {}", path.display()))
        }
    }
}

fn write_atomic_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        anyhow::bail!("invalid settings path: {}", path.display());
    };
    std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    use std::io::Write as _;
    tmp.write_all(contents.as_bytes())
        .context("write temp file")?;
    if !contents.ends_with('\n') {
        tmp.write_all(b"\n").context("write temp newline")?;
    }
    tmp.flush().context("flush temp file")?;

    tmp.persist(path).map_err(|err| {
        anyhow::Error::new(err.error).context(format!("persist settings to {}", path.display()))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    struct EnvVarGuard {
        key: &'static str,
        prev: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &Path) -> Self {
            let prev = std::env::var_os(key);
            // Safety: tests are serialized and restore the previous value on drop.
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match self.prev.take() {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_when_no_file_exists() {
        let home = tempfile::tempdir().expect("tempdir");
        let _env = EnvVarGuard::set("GHOSTTYPE_HOME", home.path());

        let store = SettingsStore::new_default().expect("store");
        assert_eq!(store.api_key().expect("api_key"), None);
        assert_eq!(store.tone().expect("tone"), Tone::Casual);
        assert_eq!(store.model().expect("model"), DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn set_then_get_round_trips_through_the_file() {
        let home = tempfile::tempdir().expect("tempdir");
        let _env = EnvVarGuard::set("GHOSTTYPE_HOME", home.path());

        let store = SettingsStore::new_default().expect("store");
        store.set_api_key("sk-test-123").expect("set key");
        store.set_tone(Tone::Formal).expect("set tone");

        let reread = SettingsStore::new_default().expect("store");
        assert_eq!(reread.api_key().expect("api_key").as_deref(), Some("sk-test-123"));
        assert_eq!(reread.tone().expect("tone"), Tone::Formal);
    }

    #[test]
    #[serial]
    fn writes_preserve_unrelated_keys_and_comments() {
        let home = tempfile::tempdir().expect("tempdir");
        let _env = EnvVarGuard::set("GHOSTTYPE_HOME", home.path());

        let store = SettingsStore::new_default().expect("store");
        std::fs::create_dir_all(home.path()).expect("mkdir");
        std::fs::write(
            store.path(),
            "# my settings\nmodel = \"gpt-4o\"\n",
        )
        .expect("seed file");

        store.set_tone(Tone::Friendly).expect("set tone");

        let contents = std::fs::read_to_string(store.path()).expect("read");
        assert!(contents.contains("# my settings"));
        assert!(contents.contains("model = \"gpt-4o\""));
        assert_eq!(store.tone().expect("tone"), Tone::Friendly);
    }

    #[test]
    #[serial]
    fn unknown_tone_falls_back_to_casual() {
        let home = tempfile::tempdir().expect("tempdir");
        let _env = EnvVarGuard::set("GHOSTTYPE_HOME", home.path());

        let store = SettingsStore::new_default().expect("store");
        std::fs::create_dir_all(home.path()).expect("mkdir");
        std::fs::write(store.path(), "tone = \"Sarcastic\"\n").expect("seed file");

        assert_eq!(store.tone().expect("tone"), Tone::Casual);
    }

    #[test]
    #[serial]
    fn blank_api_key_reads_as_unset() {
        let home = tempfile::tempdir().expect("tempdir");
        let _env = EnvVarGuard::set("GHOSTTYPE_HOME", home.path());

        let store = SettingsStore::new_default().expect("store");
        store.set_api_key("   ").expect("set key");
        assert_eq!(store.api_key().expect("api_key"), None);
    }
}
