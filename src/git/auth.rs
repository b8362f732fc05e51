//! Credentials for fetching the upstream repository
//!
//! Delegated to the user's git setup: SSH agent, keys in `~/.ssh/`, then
//! git credential helpers. Public HTTPS remotes need nothing.

use git2::{Cred, CredentialType, Error, ErrorClass, ErrorCode, RemoteCallbacks};

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

fn auth_failed(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_credentials(username: &str) -> Result<Cred, Error> {
    if let Ok(cred) = Cred::ssh_key_from_agent(username) {
        return Ok(cred);
    }

    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");
    SSH_KEY_NAMES
        .iter()
        .map(|name| (ssh_dir.join(name), ssh_dir.join(format!("{name}.pub"))))
        .filter(|(private_key, _)| private_key.exists())
        .find_map(|(private_key, public_key)| {
            let public_key = public_key.exists().then_some(public_key.as_path());
            Cred::ssh_key(username, public_key, &private_key, None).ok()
        })
        .ok_or_else(|| auth_failed("no usable SSH key found"))
}

fn helper_credentials(url: &str, username: Option<&str>) -> Result<Cred, Error> {
    let config = git2::Config::open_default().or_else(|_| git2::Config::new())?;
    Cred::credential_helper(&config, url, username)
        .or_else(|_| Cred::userpass_plaintext(username.unwrap_or(""), ""))
}

/// Install the credentials callback on `callbacks`
pub fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed| {
        if allowed.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        if allowed.contains(CredentialType::SSH_KEY) {
            return ssh_credentials(username_from_url.unwrap_or("git"));
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return helper_credentials(url, username_from_url);
        }
        Err(auth_failed("authentication failed"))
    });
}
