//! CLI argument validation functions
//!
//! Value parsers for clap arguments that need more than a type check.

use std::fs;
use std::path::PathBuf;

/// Validate port number is within valid range (1-65535)
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!(
            "Port must be a valid number between 1 and 65535, got: '{}'",
            port_str
        )
    })?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// Validate that a configuration file exists and is readable
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", path_str, e))
}

/// Validate host address format (basic validation)
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.parse::<u8>().is_err()) {
            return Err(format!("Invalid IPv4 address format: '{}'", host_str));
        }
    }

    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }

    Ok(host.to_string())
}

/// Validate an FCM device registration token
pub fn validate_device_token(token_str: &str) -> Result<String, String> {
    let token = token_str.trim();

    if token.is_empty() {
        return Err("Device token cannot be empty".to_string());
    }

    if token.contains(char::is_whitespace) {
        return Err("Device token cannot contain whitespace".to_string());
    }

    Ok(token.to_string())
}

/// Validate a user id used as a Firestore document id
pub fn validate_uid(uid_str: &str) -> Result<String, String> {
    let uid = uid_str.trim();

    if uid.is_empty() {
        return Err("User id cannot be empty".to_string());
    }

    if uid.contains('/') {
        return Err(format!("User id cannot contain '/': '{}'", uid_str));
    }

    if uid == "." || uid == ".." {
        return Err(format!("'{}' is not a valid user id", uid));
    }

    Ok(uid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_port_validation() {
        for port in ["1", "80", "3000", "65535"] {
            assert!(validate_port(port).is_ok(), "Port {} should be valid", port);
        }
        for port in ["0", "65536", "abc", "-1", ""] {
            assert!(validate_port(port).is_err(), "Port {} should be invalid", port);
        }
    }

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "10.0.0.1", "relay.internal"] {
            assert!(validate_host_address(host).is_ok(), "Host {} should be valid", host);
        }

        let too_long = "x".repeat(300);
        for host in ["", "   ", "host with spaces", "999.1.1.1", "1.2.3", too_long.as_str()] {
            assert!(validate_host_address(host).is_err(), "Host '{}' should be invalid", host);
        }
    }

    #[test]
    fn test_config_file_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]").unwrap();

        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());
        assert!(validate_config_file_path("/nonexistent/push-relay.toml").is_err());
    }

    #[test]
    fn test_device_token_validation() {
        assert_eq!(validate_device_token("  abc123 ").unwrap(), "abc123");
        assert!(validate_device_token("").is_err());
        assert!(validate_device_token("abc 123").is_err());
    }

    #[test]
    fn test_uid_validation() {
        assert_eq!(validate_uid("u1").unwrap(), "u1");
        assert!(validate_uid(" ").is_err());
        assert!(validate_uid("users/u1").is_err());
        assert!(validate_uid("..").is_err());
        assert!(validate_uid(".").is_err());
        assert_eq!(validate_uid("..a").unwrap(), "..a");
    }
}
