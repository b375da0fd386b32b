//! Chained mode: structured SSH to the first jump host, then a raw
//! interactive PTY nesting `ssh -l USER IP` through each subsequent hop.
//!
//! A session that went through this path stays chained for its
//! lifetime — later device commands are sent through the same PTY via
//! the timing-based send, never re-framed as a one-shot `exec`.

use crate::error::SshError;
use crate::handler::AcceptAllHandler;
use crate::types::Credentials;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const SSH_PORT: u16 = 22;
const MAX_HOP_ATTEMPTS: u32 = 10;

pub struct ChainedSession {
    target_ip: String,
    jump_path: Vec<String>,
    _handle: Handle<AcceptAllHandler>,
    channel: Channel<Msg>,
}

impl ChainedSession {
    /// Connect to `jump_path[0]` directly, then nest `ssh -l user ip`
    /// through each remaining entry. `hop_credentials` must have the
    /// same length as `jump_path`; `hop_credentials[0]` authenticates
    /// the first hop, `hop_credentials[i]` (i >= 1) is used to log
    /// into `jump_path[i]` from the previous hop.
    pub async fn connect(
        jump_path: &[String],
        hop_credentials: &[Credentials],
    ) -> Result<Self, SshError> {
        if jump_path.len() < 2 || jump_path.len() != hop_credentials.len() {
            let id = jump_path.first().cloned().unwrap_or_default();
            return Err(SshError::ChainFailure(id, 0));
        }

        let first_ip = &jump_path[0];
        let first_creds = &hop_credentials[0];

        let config = Arc::new(client::Config::default());
        let mut handle = timeout(
            CONNECT_TIMEOUT,
            client::connect(config, (first_ip.as_str(), SSH_PORT), AcceptAllHandler),
        )
        .await
        .map_err(|_| SshError::ConnectTimeout(first_ip.clone()))?
        .map_err(|e| SshError::Setup(first_ip.clone(), e))?;

        let authenticated = handle
            .authenticate_password(&first_creds.username, &first_creds.password)
            .await?;
        if !authenticated.success() {
            return Err(SshError::AuthRejected(first_ip.clone()));
        }

        let mut channel = handle.channel_open_session().await?;
        channel.request_pty(false, "vt100", 80, 24, 0, 0, &[]).await?;
        channel.request_shell(true).await?;
        let _ = read_for(&mut channel, Duration::from_millis(500)).await;

        let mut session = Self {
            target_ip: jump_path.last().cloned().unwrap_or_default(),
            jump_path: jump_path.to_vec(),
            _handle: handle,
            channel,
        };

        log::info!("[ssh chain] attempting connection via path: {}", jump_path.join(" -> "));

        for hop_index in 1..jump_path.len() {
            let next_ip = jump_path[hop_index].clone();
            let creds = hop_credentials[hop_index].clone();
            session.hop(&jump_path[hop_index - 1], &next_ip, &creds).await?;
        }

        log::info!(
            "[ssh chain] successfully reached target {} through path: {}",
            session.target_ip,
            session.jump_path.join(" -> ")
        );
        Ok(session)
    }

    pub fn target_ip(&self) -> &str {
        &self.target_ip
    }

    pub fn jump_path(&self) -> &[String] {
        &self.jump_path
    }

    /// Run a command through the already-established chained PTY.
    pub async fn exec(&mut self, command: &str) -> Result<String, SshError> {
        self.send_command_timing(command, 4, Duration::from_secs(30)).await
    }

    async fn hop(&mut self, from_ip: &str, next_ip: &str, creds: &Credentials) -> Result<(), SshError> {
        let cmd = format!("ssh -l {} {next_ip}", creds.username);
        log::debug!("[ssh chain] hop {from_ip} -> {next_ip}: sending `{cmd}`");
        let mut output = self.send_command_timing(&cmd, 4, Duration::from_secs(20)).await?;

        let mut connected = false;
        for _ in 0..MAX_HOP_ATTEMPTS {
            let lower = output.to_lowercase();

            if lower.contains("password:") {
                log::debug!("[ssh chain] password prompt detected, sending password");
                output = self
                    .send_command_timing(&creds.password, 3, Duration::from_secs(15))
                    .await?;
                continue;
            }

            if lower.contains("(yes/no") || lower.contains("continue connecting") {
                log::debug!("[ssh chain] host key prompt detected, sending yes");
                output = self.send_command_timing("yes", 2, Duration::from_secs(10)).await?;
                continue;
            }

            if output.contains('#') || output.contains('>') {
                let last_line = output.trim_end().lines().last().unwrap_or("").trim();
                if last_line.ends_with('#') || last_line.ends_with('>') {
                    log::debug!("[ssh chain] connected to {next_ip}, prompt: {last_line}");
                    connected = true;
                    break;
                }
            }

            if output.trim().is_empty() {
                tokio::time::sleep(Duration::from_secs(2)).await;
                output = self.send_command_timing("", 2, Duration::from_secs(10)).await?;
            } else {
                tokio::time::sleep(Duration::from_secs(1)).await;
                let more = self.send_command_timing("", 1, Duration::from_secs(10)).await?;
                output.push_str(&more);
            }
        }

        if !connected {
            log::warn!("[ssh chain] failed to connect to {next_ip} after {MAX_HOP_ATTEMPTS} attempts");
            return Err(SshError::ChainFailure(next_ip.to_string(), MAX_HOP_ATTEMPTS));
        }
        Ok(())
    }

    async fn send_command_timing(
        &mut self,
        command: &str,
        delay_factor: u64,
        read_timeout: Duration,
    ) -> Result<String, SshError> {
        let mut line = command.as_bytes().to_vec();
        line.push(b'\n');
        self.channel.data(&line[..]).await?;
        tokio::time::sleep(Duration::from_millis(300 * delay_factor)).await;
        let raw = read_for(&mut self.channel, read_timeout).await?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    pub async fn disconnect(mut self) -> Result<(), SshError> {
        self._handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}

async fn read_for(channel: &mut Channel<Msg>, duration: Duration) -> Result<Vec<u8>, SshError> {
    let mut buf = Vec::new();
    let deadline = Instant::now() + duration;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match timeout(deadline - now, channel.wait()).await {
            Ok(Some(ChannelMsg::Data { data })) => buf.extend_from_slice(&data),
            Ok(Some(ChannelMsg::ExtendedData { data, .. })) => buf.extend_from_slice(&data),
            Ok(Some(ChannelMsg::Eof)) | Ok(None) => break,
            Ok(Some(_)) => {}
            Err(_) => break,
        }
    }
    Ok(buf)
}
