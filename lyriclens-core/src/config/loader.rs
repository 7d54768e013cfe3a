//! TOML profile loading

use log::warn;

use super::profile::{ConfigError, DeviceProfile};

/// Parse and validate a device profile from TOML
///
/// Missing tables and keys fall back to the reference profile, so a file
/// only needs to name what differs:
///
/// ```toml
/// width = 640
/// height = 240
///
/// [layout]
/// art_size = 96
/// ```
pub fn parse_profile(text: &str) -> Result<DeviceProfile, ConfigError> {
    let profile: DeviceProfile = toml::from_str(text).map_err(|e| {
        warn!("device profile rejected: {}", e);
        ConfigError::Parse {
            offset: e.span().map(|span| span.start),
        }
    })?;
    profile.validate()?;
    Ok(profile)
}
