//! Accepts any server host key.
//!
//! Devices in scope here are pre-vetted by the inventory (their IP and
//! credentials already live in the store); there is no user-facing
//! known_hosts prompt to honor, so host key checking is not meaningful.

pub struct AcceptAllHandler;

impl russh::client::Handler for AcceptAllHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}
