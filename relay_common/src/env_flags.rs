use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("'{0}' is not a recognised boolean value")]
pub struct FlagParseError(pub String);

/// Parses the loose boolean values accepted in environment variables.
pub fn parse_flag(value: &str) -> Result<bool, FlagParseError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(FlagParseError(value.to_string())),
    }
}
