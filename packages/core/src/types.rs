// ABOUTME: Type definitions shared across setkit packages
// ABOUTME: Namespaces, write permissions and key/value setting entries

use crate::error::CoreError;
use crate::utils::compare_chars_ignore_case;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::iter;
use std::str::FromStr;

/// Partition of the settings store. Each namespace has its own write permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    System,
    Secure,
    Global,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::System => "system",
            Namespace::Secure => "secure",
            Namespace::Global => "global",
        }
    }

    /// Permission a caller must hold to mutate this namespace
    pub fn required_permission(&self) -> Permission {
        match self {
            Namespace::System => Permission::WriteSettings,
            Namespace::Secure | Namespace::Global => Permission::WriteSecureSettings,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(Namespace::System),
            "secure" => Ok(Namespace::Secure),
            "global" => Ok(Namespace::Global),
            _ => Err(CoreError::UnknownNamespace(s.to_string())),
        }
    }
}

/// Write permission guarding one or more namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    WriteSettings,
    WriteSecureSettings,
}

const PERMISSION_PREFIX: &str = "android.permission.";

impl Permission {
    pub const ALL: [Permission; 2] = [Permission::WriteSettings, Permission::WriteSecureSettings];

    pub fn name(&self) -> &'static str {
        match self {
            Permission::WriteSettings => "WRITE_SETTINGS",
            Permission::WriteSecureSettings => "WRITE_SECURE_SETTINGS",
        }
    }

    /// Fully qualified name, as reported in `ERR:<name> required` lines
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Permission::WriteSettings => "android.permission.WRITE_SETTINGS",
            Permission::WriteSecureSettings => "android.permission.WRITE_SECURE_SETTINGS",
        }
    }

    /// Best-effort classification of a free-text denial message.
    ///
    /// The secure variant is checked first so a message naming both
    /// permissions resolves to the stricter one.
    pub fn from_message(message: &str) -> Option<Self> {
        if message.contains(Permission::WriteSecureSettings.name()) {
            Some(Permission::WriteSecureSettings)
        } else if message.contains(Permission::WriteSettings.name()) {
            Some(Permission::WriteSettings)
        } else {
            None
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    /// Accepts `WRITE_SETTINGS` or `android.permission.WRITE_SETTINGS`, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let bare = upper
            .strip_prefix(&PERMISSION_PREFIX.to_uppercase())
            .unwrap_or(upper.as_str());

        Permission::ALL
            .into_iter()
            .find(|permission| permission.name() == bare)
            .ok_or_else(|| CoreError::UnknownPermission(s.to_string()))
    }
}

/// A named string setting within a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

impl SettingEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Characters of the `key=value` rendering, without allocating it
    fn line_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.key
            .chars()
            .chain(iter::once('='))
            .chain(self.value.chars())
    }

    /// Case-insensitive ordering of the rendered `key=value` lines
    pub fn cmp_ignore_case(&self, other: &Self) -> Ordering {
        compare_chars_ignore_case(self.line_chars(), other.line_chars())
    }
}

impl fmt::Display for SettingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("system", Namespace::System)]
    #[case("SYSTEM", Namespace::System)]
    #[case("Secure", Namespace::Secure)]
    #[case("gLoBaL", Namespace::Global)]
    fn test_namespace_parse_is_case_insensitive(#[case] input: &str, #[case] expected: Namespace) {
        assert_eq!(input.parse::<Namespace>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("systems")]
    #[case(" system")]
    #[case("local")]
    fn test_namespace_parse_rejects_unknown(#[case] input: &str) {
        assert_eq!(
            input.parse::<Namespace>(),
            Err(CoreError::UnknownNamespace(input.to_string()))
        );
    }

    #[test]
    fn test_required_permissions() {
        assert_eq!(
            Namespace::System.required_permission(),
            Permission::WriteSettings
        );
        assert_eq!(
            Namespace::Secure.required_permission(),
            Permission::WriteSecureSettings
        );
        assert_eq!(
            Namespace::Global.required_permission(),
            Permission::WriteSecureSettings
        );
    }

    #[rstest]
    #[case("Permission denial: requires android.permission.WRITE_SECURE_SETTINGS", Some(Permission::WriteSecureSettings))]
    #[case("you need WRITE_SETTINGS to do that", Some(Permission::WriteSettings))]
    #[case("needs WRITE_SETTINGS or WRITE_SECURE_SETTINGS", Some(Permission::WriteSecureSettings))]
    #[case("some other failure", None)]
    #[case("", None)]
    fn test_permission_from_message(#[case] message: &str, #[case] expected: Option<Permission>) {
        assert_eq!(Permission::from_message(message), expected);
    }

    #[rstest]
    #[case("WRITE_SETTINGS", Permission::WriteSettings)]
    #[case("write_secure_settings", Permission::WriteSecureSettings)]
    #[case("android.permission.WRITE_SETTINGS", Permission::WriteSettings)]
    #[case(" android.permission.write_secure_settings ", Permission::WriteSecureSettings)]
    fn test_permission_parse(#[case] input: &str, #[case] expected: Permission) {
        assert_eq!(input.parse::<Permission>().unwrap(), expected);
    }

    #[test]
    fn test_permission_parse_unknown() {
        assert!("READ_SETTINGS".parse::<Permission>().is_err());
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            Permission::WriteSecureSettings.qualified_name(),
            format!("{}{}", PERMISSION_PREFIX, Permission::WriteSecureSettings.name())
        );
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(SettingEntry::new("screen_brightness", "128").to_string(), "screen_brightness=128");
        assert_eq!(SettingEntry::new("empty", "").to_string(), "empty=");
    }

    #[test]
    fn test_entry_ordering_uses_rendered_line() {
        let upper = SettingEntry::new("A", "1");
        let lower = SettingEntry::new("b", "2");
        assert_eq!(upper.cmp_ignore_case(&lower), Ordering::Less);
        assert_eq!(
            SettingEntry::new("Key", "x").cmp_ignore_case(&SettingEntry::new("key", "X")),
            Ordering::Equal
        );
        // '=' sorts before '_', so a key that is a prefix of another comes first
        assert_eq!(
            SettingEntry::new("a", "9").cmp_ignore_case(&SettingEntry::new("a_b", "1")),
            Ordering::Less
        );
    }

    #[test]
    fn test_serde_representation() {
        assert_eq!(serde_json::to_string(&Namespace::Global).unwrap(), "\"global\"");
        assert_eq!(
            serde_json::to_string(&Permission::WriteSecureSettings).unwrap(),
            "\"WRITE_SECURE_SETTINGS\""
        );
    }
}
