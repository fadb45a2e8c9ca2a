use crate::utils::error::{FabricError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FabricError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 會放進 URL 路徑或檔名的單一名稱
pub fn validate_path_segment(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    let has_reserved = value
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_control());
    if has_reserved || value == "." || value == ".." {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a single name without '/', '\\', '?', '#' or '%'".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

pub fn validate_integer(field_name: &str, value: &str) -> Result<()> {
    value
        .parse::<i64>()
        .map(|_| ())
        .map_err(|e| FabricError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Not an integer: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gateway.url", "https://example.com").is_ok());
        assert!(validate_url("gateway.url", "http://localhost:8443").is_ok());
        assert!(validate_url("gateway.url", "").is_err());
        assert!(validate_url("gateway.url", "invalid-url").is_err());
        assert!(validate_url("gateway.url", "grpcs://peer0:7051").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("client.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("client.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_path_segment() {
        assert!(validate_path_segment("channel", "mychannel").is_ok());
        assert!(validate_path_segment("peer", "peer0.org1.example.com").is_ok());
        assert!(validate_path_segment("user", "../x").is_err());
        assert!(validate_path_segment("user", "a\\b").is_err());
        assert!(validate_path_segment("channel", "my channel?x=1").is_err());
        assert!(validate_path_segment("user", "..").is_err());
        assert!(matches!(
            validate_path_segment("user", "  "),
            Err(FabricError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_validate_non_empty_and_integer() {
        assert!(validate_non_empty_string("user", "appUser").is_ok());
        assert!(validate_non_empty_string("user", "   ").is_err());
        assert!(validate_integer("initial_value", "100").is_ok());
        assert!(validate_integer("initial_value", "-7").is_ok());
        assert!(validate_integer("initial_value", "ten").is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("failure_policy", "stop", &["stop", "continue"]).is_ok());
        assert!(validate_one_of("failure_policy", "retry", &["stop", "continue"]).is_err());
    }
}
