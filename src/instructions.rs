//! Operator instructions printed once the QR image is on disk

use crate::config::OutputOptions;
use std::path::Path;

/// Placeholder used when the SSH peer cannot be determined
pub const UNKNOWN_HOST: &str = "<host>";

/// Host suggested for `scp`: the first field of `SSH_CONNECTION`.
pub fn remote_host(ssh_connection: Option<&str>) -> Option<&str> {
    ssh_connection?.split_whitespace().next()
}

/// Suggested command for copying the QR image to the operator's machine
pub fn scp_command(path: &Path, options: &OutputOptions, ssh_connection: Option<&str>) -> String {
    let host = remote_host(ssh_connection).unwrap_or(UNKNOWN_HOST);
    format!(
        "scp {}@{}:{} {}",
        options.remote_user,
        host,
        path.display(),
        options.local_path
    )
}

/// Lines shown after the QR image has been written.
pub fn render(path: &Path, options: &OutputOptions, ssh_connection: Option<&str>) -> Vec<String> {
    vec![
        String::new(),
        "✅ QR code generated!".to_string(),
        format!("📁 File path: {}", path.display()),
        String::new(),
        "Copy the QR image to your workstation with:".to_string(),
        format!("  {}", scp_command(path, options, ssh_connection)),
        String::new(),
        format!(
            "Then scan {} with the messaging app on your phone",
            options.local_path
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_first_field() {
        assert_eq!(
            remote_host(Some("203.0.113.7 51514 198.51.100.2 22")),
            Some("203.0.113.7")
        );
        assert_eq!(remote_host(Some("   ")), None);
        assert_eq!(remote_host(None), None);
    }

    #[test]
    fn scp_command_uses_configured_paths() {
        let options = OutputOptions::default();
        let cmd = scp_command(
            Path::new("/root/.openclaw/workspace/whatsapp-qr.png"),
            &options,
            Some("10.0.0.5 40000 10.0.0.1 22"),
        );
        assert_eq!(
            cmd,
            "scp root@10.0.0.5:/root/.openclaw/workspace/whatsapp-qr.png ~/Desktop/whatsapp-qr.png"
        );
    }

    #[test]
    fn missing_ssh_connection_yields_placeholder() {
        let options = OutputOptions::default();
        let cmd = scp_command(Path::new("/tmp/qr.png"), &options, None);
        assert_eq!(cmd, "scp root@<host>:/tmp/qr.png ~/Desktop/whatsapp-qr.png");
    }

    #[test]
    fn rendered_lines_mention_path_and_command() {
        let options = OutputOptions::default();
        let lines = render(Path::new("/tmp/qr.png"), &options, Some("1.2.3.4 1 5.6.7.8 22"));
        assert!(lines.iter().any(|l| l.contains("/tmp/qr.png")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("scp root@1.2.3.4:")));
    }
}
