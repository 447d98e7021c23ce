//! SFTP implementation of the remote transport.
//!
//! Connects over SSH with key-based authentication and performs all
//! file operations through the SFTP subsystem, mirroring what the
//! deploy hosts expose.

use parcel_config::RemoteConfig;
use parcel_core::error::ParcelError;
use ssh2::{Session, Sftp};
use std::fs::File;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{Remote, TransportResult};

/// SFTP-backed remote
pub struct SftpRemote {
    // The session owns the TCP connection; kept alive for the sftp handle
    _session: Session,
    sftp: Sftp,
    remote_dir: String,
}

impl SftpRemote {
    /// Connect and authenticate against the configured host
    pub fn connect(config: &RemoteConfig) -> TransportResult<Self> {
        let address = format!("{}:{}", config.host, config.port);
        info!("Connecting to {}", address);

        let tcp = TcpStream::connect(&address)
            .map_err(|e| ParcelError::io(format!("Failed to connect to {}", address), e))?;

        let mut session = Session::new()
            .map_err(|e| ParcelError::transport("Failed to create SSH session", e))?;
        session.set_timeout((config.timeout_secs * 1000) as u32);
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| ParcelError::transport("SSH handshake failed", e))?;

        let key_path = expand_key_path(&config.key_path);
        session
            .userauth_pubkey_file(&config.username, None, &key_path, None)
            .map_err(|e| {
                ParcelError::transport(
                    format!("Authentication failed for {}@{}", config.username, config.host),
                    e,
                )
            })?;

        let sftp = session
            .sftp()
            .map_err(|e| ParcelError::transport("Failed to open SFTP channel", e))?;

        Ok(Self {
            _session: session,
            sftp,
            remote_dir: config.remote_dir.clone(),
        })
    }

    /// The configured remote package directory
    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }
}

impl Remote for SftpRemote {
    fn list_files(&self, remote_path: &str) -> TransportResult<Vec<String>> {
        let entries = self.sftp.readdir(Path::new(remote_path)).map_err(|e| {
            ParcelError::transport(format!("Failed to list remote directory {}", remote_path), e)
        })?;

        let names = entries
            .into_iter()
            .filter(|(_, stat)| !stat.is_dir())
            .filter_map(|(path, _)| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect();

        Ok(names)
    }

    fn upload(&self, local_path: &Path, remote_path: &str) -> TransportResult<()> {
        debug!("Uploading {} to {}", local_path.display(), remote_path);

        let mut local_file = File::open(local_path).map_err(|e| {
            ParcelError::io(format!("Failed to open local file {}", local_path.display()), e)
        })?;

        let mut remote_file = self.sftp.create(Path::new(remote_path)).map_err(|e| {
            ParcelError::transport(format!("Failed to create remote file {}", remote_path), e)
        })?;

        std::io::copy(&mut local_file, &mut remote_file)
            .map_err(|e| ParcelError::io("Failed to upload file", e))?;

        Ok(())
    }

    fn download(&self, remote_path: &str, local_path: &Path) -> TransportResult<()> {
        debug!("Downloading {} to {}", remote_path, local_path.display());

        let mut remote_file = self.sftp.open(Path::new(remote_path)).map_err(|e| {
            ParcelError::transport(format!("Failed to open remote file {}", remote_path), e)
        })?;

        if let Some(parent) = local_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ParcelError::io(
                    format!("Failed to create local directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let mut local_file = File::create(local_path).map_err(|e| {
            ParcelError::io(
                format!("Failed to create local file {}", local_path.display()),
                e,
            )
        })?;

        std::io::copy(&mut remote_file, &mut local_file)
            .map_err(|e| ParcelError::io("Failed to download file", e))?;

        Ok(())
    }

    fn ensure_dir(&self, remote_path: &str) -> TransportResult<()> {
        if self.sftp.stat(Path::new(remote_path)).is_ok() {
            return Ok(());
        }

        // No recursive mkdir in SFTP; create each missing component
        let mut current = PathBuf::new();
        for component in Path::new(remote_path).components() {
            current.push(component);
            if matches!(component, std::path::Component::RootDir) {
                continue;
            }
            if self.sftp.stat(&current).is_err() {
                self.sftp.mkdir(&current, 0o755).map_err(|e| {
                    ParcelError::transport(
                        format!("Failed to create remote directory {}", current.display()),
                        e,
                    )
                })?;
            }
        }

        Ok(())
    }

    fn file_exists(&self, remote_path: &str) -> TransportResult<bool> {
        Ok(self.sftp.stat(Path::new(remote_path)).is_ok())
    }

    fn file_size(&self, remote_path: &str) -> TransportResult<u64> {
        let stat = self.sftp.stat(Path::new(remote_path)).map_err(|e| {
            ParcelError::transport(format!("Failed to stat remote file {}", remote_path), e)
        })?;
        Ok(stat.size.unwrap_or(0))
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_key_path(key_path: &str) -> PathBuf {
    if let Some(rest) = key_path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(key_path)
}
