//! Direct mode: a single structured SSH session against one device.

use crate::error::SshError;
use crate::handler::AcceptAllHandler;
use crate::types::Credentials;
use russh::client::{self, Handle};
use russh::ChannelMsg;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(10);
const SSH_PORT: u16 = 22;

pub struct DirectSession {
    host: String,
    handle: Handle<AcceptAllHandler>,
}

impl DirectSession {
    /// Open a structured session to `host`, authenticating with
    /// `creds`. Fails after 10 seconds if no connection is established.
    pub async fn connect(host: &str, creds: &Credentials) -> Result<Self, SshError> {
        let config = Arc::new(client::Config::default());
        let addr = (host, SSH_PORT);

        let mut handle = timeout(CONNECT_TIMEOUT, client::connect(config, addr, AcceptAllHandler))
            .await
            .map_err(|_| SshError::ConnectTimeout(host.to_string()))?
            .map_err(|e| SshError::Setup(host.to_string(), e))?;

        let authenticated = timeout(
            CONNECT_TIMEOUT,
            handle.authenticate_password(&creds.username, &creds.password),
        )
        .await
        .map_err(|_| SshError::ConnectTimeout(host.to_string()))?
        .map_err(SshError::Transport)?;

        if !authenticated.success() {
            return Err(SshError::AuthRejected(host.to_string()));
        }

        log::debug!("[{host}] direct session established");
        Ok(Self {
            host: host.to_string(),
            handle,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Execute one command and return its combined stdout/stderr, with
    /// a 10-second read timeout and the `#` prompt implicitly bounding
    /// output via channel EOF (non-interactive `exec`, one shot).
    pub async fn exec(&mut self, command: &str) -> Result<String, SshError> {
        let mut channel = self.handle.channel_open_session().await?;
        channel.exec(true, command).await?;

        let mut output = Vec::new();
        let mut exit_status = None;

        loop {
            let msg = match timeout(READ_TIMEOUT, channel.wait()).await {
                Ok(Some(msg)) => msg,
                Ok(None) => break,
                Err(_) => break,
            };
            match msg {
                ChannelMsg::Data { data } => output.extend_from_slice(&data),
                ChannelMsg::ExtendedData { data, .. } => output.extend_from_slice(&data),
                ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
                ChannelMsg::Eof | ChannelMsg::Close => break,
                _ => {}
            }
        }

        if let Some(status) = exit_status {
            if status != 0 {
                return Err(SshError::CommandFailure(self.host.clone(), status));
            }
        }

        Ok(String::from_utf8(output)?)
    }

    pub async fn disconnect(mut self) -> Result<(), SshError> {
        self.handle
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await?;
        Ok(())
    }
}
