//! Checksummed on-disk store, one file per user.

use super::{validate_with_store, AuthResult, Authenticator, StoreError, UserStore};
use crate::core::constants::SAVE_VERSION_MAGIC;
use crate::core::user::UserRecord;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Stores each user record as `<id>.dat` in a save directory.
pub struct SaveStore {
    save_dir: PathBuf,
}

impl SaveStore {
    /// Creates a store in the platform config directory
    /// using the `directories` crate.
    pub fn new() -> Result<Self, StoreError> {
        let project_dirs = ProjectDirs::from("", "", "drx-miner").ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;
        Self::in_dir(project_dirs.config_dir().join("users"))
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let save_dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&save_dir)?;
        Ok(Self { save_dir })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// File path for a user id. Characters outside `[A-Za-z0-9_-]` are
    /// replaced so ids cannot escape the save directory.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.save_dir.join(format!("{}.dat", sanitize_id(id)))
    }

    /// Referral inbox for a user: one referred id per line.
    pub fn referrals_path_for(&self, id: &str) -> PathBuf {
        self.save_dir.join(format!("{}.referrals", sanitize_id(id)))
    }

    /// Writes a record with checksum verification.
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized record (variable length)
    /// - SHA256 checksum (32 bytes)
    ///
    /// The file is written to a temporary sibling and renamed into place.
    pub fn write_record(&self, id: &str, user: &UserRecord) -> Result<(), StoreError> {
        let data = bincode::serialize(user)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let path = self.path_for(id);
        let tmp_path = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
            file.write_all(&data_len.to_le_bytes())?;
            file.write_all(&data)?;
            file.write_all(&checksum)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Reads a record, verifying version magic and checksum.
    /// Returns `Ok(None)` when the user has no save file.
    pub fn read_record(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut file = match fs::File::open(self.path_for(id)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);
        if version != SAVE_VERSION_MAGIC {
            return Err(StoreError::Version {
                expected: SAVE_VERSION_MAGIC,
                found: version,
            });
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(StoreError::Checksum);
        }

        Ok(Some(bincode::deserialize(&data)?))
    }
}

fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl UserStore for SaveStore {
    fn load_user(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.read_record(id)
    }

    fn save_user(&self, id: &str, user: &UserRecord) -> Result<(), StoreError> {
        self.write_record(id, user)
    }

    fn add_referral(&self, referrer_id: &str, referred_id: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.referrals_path_for(referrer_id))?;
        writeln!(file, "{}", sanitize_id(referred_id))?;
        file.sync_all()?;
        Ok(())
    }

    fn take_referrals(&self, id: &str) -> Result<Vec<String>, StoreError> {
        // Claim the inbox by renaming it; later referrals start a new file
        let inbox = self.referrals_path_for(id);
        let claimed = inbox.with_extension("referrals-taken");
        match fs::rename(&inbox, &claimed) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }
        let contents = fs::read_to_string(&claimed)?;
        fs::remove_file(&claimed)?;
        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl Authenticator for SaveStore {
    fn validate(&self, user_id: &str, auth_key: &str) -> Result<AuthResult, StoreError> {
        validate_with_store(self, user_id, auth_key)
    }
}
