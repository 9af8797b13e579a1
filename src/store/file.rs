use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};

use crate::error::PinvaultError;
use crate::pin::{Pin, PinGate};
use crate::store::{Result, Store};
use crate::transform;

/// What `FileStore::load` found on disk.
#[derive(Debug, PartialEq, Eq)]
pub enum Loaded {
    /// No passwords file yet.
    Fresh,
    Existing { entries: usize, skipped: usize },
}

/// Flat-text store: one `<name> <obfuscated>` line per account.
pub struct FileStore {
    path: PathBuf,
    shift: u8,
    /// Name to obfuscated password, in insertion order.
    accounts: IndexMap<String, String>,
    gate: PinGate,
}

impl FileStore {
    /// An empty store with no active PIN. Call `load` to read existing entries.
    pub fn new(path: PathBuf, shift: u8) -> Self {
        Self {
            path,
            shift,
            accounts: IndexMap::new(),
            gate: PinGate::unset(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the passwords file into memory. A missing file is not an error.
    pub fn load(&mut self) -> Result<Loaded> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no passwords file");
                return Ok(Loaded::Fresh);
            }
            Err(e) => return Err(PinvaultError::Io(e)),
        };

        let mut entries = 0usize;
        let mut skipped = 0usize;
        for line in content.lines() {
            if line.trim_matches(is_separator).is_empty() {
                continue;
            }
            match parse_line(line) {
                Some((name, obfuscated)) => {
                    self.accounts.insert(name.to_string(), obfuscated.to_string());
                    entries += 1;
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "ignored malformed lines in passwords file");
        }
        tracing::debug!(entries, accounts = self.accounts.len(), "loaded passwords file");
        Ok(Loaded::Existing { entries, skipped })
    }

    fn authorize(&self, pin: Pin) -> Result<()> {
        if self.gate.check(pin) {
            Ok(())
        } else {
            tracing::info!("PIN check failed");
            Err(PinvaultError::AccessDenied)
        }
    }
}

/// Whitespace as older files were written and split: Unicode whitespace plus
/// the ASCII information separators U+001C..=U+001F.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Split a line at its first whitespace run. `None` when there is no second token.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.trim_matches(is_separator).split_once(is_separator)?;
    let obfuscated = rest.trim_start_matches(is_separator);
    if obfuscated.is_empty() {
        return None;
    }
    Some((name, obfuscated))
}

impl Store for FileStore {
    fn add(&mut self, name: &str, password: &SecretString) -> Result<()> {
        if name.is_empty() {
            return Err(PinvaultError::EmptyField("Account name"));
        }
        let plaintext = password.expose_secret();
        if plaintext.is_empty() {
            return Err(PinvaultError::EmptyField("Password"));
        }
        self.accounts
            .insert(name.to_string(), transform::obfuscate(plaintext, self.shift));
        Ok(())
    }

    fn get(&self, name: &str, pin: Pin) -> Result<SecretString> {
        self.authorize(pin)?;
        let obfuscated = self
            .accounts
            .get(name)
            .ok_or_else(|| PinvaultError::NotFound(name.to_string()))?;
        Ok(SecretString::new(transform::reveal(obfuscated, self.shift)))
    }

    fn delete(&mut self, name: &str, pin: Pin) -> Result<()> {
        self.authorize(pin)?;
        self.accounts
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| PinvaultError::NotFound(name.to_string()))
    }

    fn list(&self) -> Vec<String> {
        self.accounts.keys().cloned().collect()
    }

    /// Rewrite the passwords file with every entry, replacing it atomically.
    fn save(&self) -> Result<()> {
        let mut body = String::new();
        for (name, obfuscated) in &self.accounts {
            body.push_str(name);
            body.push(' ');
            body.push_str(obfuscated);
            body.push('\n');
        }

        // Replace the file a symlink points at, not the link itself.
        let target = match std::fs::canonicalize(&self.path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.path.clone(),
            Err(e) => return Err(PinvaultError::Io(e)),
        };
        let existing_permissions = match std::fs::metadata(&target) {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(PinvaultError::Io(e)),
        };

        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(target.file_name().unwrap_or_else(|| "passwords".as_ref()));
        tmp_name.push(format!(".tmp.{}", rand::random::<u64>()));
        let tmp_path = parent.join(tmp_name);

        // Written in full and synced before it replaces the target.
        let written = (|| -> std::io::Result<()> {
            let mut tmp = std::fs::File::create(&tmp_path)?;
            if let Some(permissions) = existing_permissions {
                tmp.set_permissions(permissions)?;
            }
            tmp.write_all(body.as_bytes())?;
            tmp.sync_all()?;
            std::fs::rename(&tmp_path, &target)
        })();
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(PinvaultError::Io(e));
        }

        tracing::debug!(
            accounts = self.accounts.len(),
            path = %self.path.display(),
            "saved passwords file"
        );
        Ok(())
    }

    fn set_pin(&mut self, pin: Pin) {
        self.gate.set(pin);
    }

    fn has_pin(&self) -> bool {
        self.gate.is_set()
    }
}
