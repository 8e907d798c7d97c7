// ─── Version File ───
// Parses a cached version JSON and evaluates OS rules for libraries.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::Platform;

/// A parsed version manifest (`versions/<id>/<id>.json`).
///
/// Fields needed only at launch time stay optional here so a manifest can be
/// loaded (e.g. for alias resolution) even when it is incomplete; the launch
/// pipeline checks them through the `require_*` accessors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    /// Space-separated launch-argument template.
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    /// Asset index name.
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub custom_files: bool,
    /// SHA-1 of the main program archive.
    #[serde(default)]
    pub jar_hash: Option<String>,
    #[serde(default)]
    pub release_time: Option<String>,
}

// ─── Library Entry with Rules ───

#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default)]
    pub rules: Option<Vec<LibraryRule>>,
    /// Presence marks the library as a native archive; the mapping itself is
    /// not consulted.
    #[serde(default)]
    pub natives: Option<serde_json::Value>,
}

// ─── OS Rule Evaluation ───

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
    /// Any other action; folding it leaves the verdict unchanged.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    /// Other predicates (`arch`, `version`, ...); never matched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OsRule {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.extra.is_empty()
    }
}

impl LibraryRule {
    pub fn allow() -> Self {
        Self {
            action: RuleAction::Allow,
            os: None,
        }
    }

    pub fn disallow_on(os: &str) -> Self {
        Self::for_os(RuleAction::Disallow, os)
    }

    pub fn allow_on(os: &str) -> Self {
        Self::for_os(RuleAction::Allow, os)
    }

    fn for_os(action: RuleAction, os: &str) -> Self {
        Self {
            action,
            os: Some(OsRule {
                name: Some(os.to_string()),
                ..OsRule::default()
            }),
        }
    }

    /// Apply this rule to the running verdict.
    fn fold(&self, allowed: bool, platform: Platform) -> bool {
        let unconditional = self.os.as_ref().map_or(true, OsRule::is_empty);
        let os_matches = self
            .os
            .as_ref()
            .and_then(|os| os.name.as_deref())
            .is_some_and(|name| platform.matches(name));

        // A disallow needs a matching OS name to have any effect.
        match self.action {
            RuleAction::Allow if unconditional || os_matches => true,
            RuleAction::Disallow if os_matches => false,
            _ => allowed,
        }
    }
}

/// Evaluate an ordered rule list for `platform`.
///
/// An empty list allows. Otherwise the verdict starts as "disallowed" and
/// every rule is folded in declaration order, so later rules override earlier
/// ones.
pub fn rules_allow(rules: &[LibraryRule], platform: Platform) -> bool {
    if rules.is_empty() {
        return true;
    }

    rules
        .iter()
        .fold(false, |allowed, rule| rule.fold(allowed, platform))
}

impl LibraryEntry {
    pub fn is_allowed_on(&self, platform: Platform) -> bool {
        rules_allow(self.rules.as_deref().unwrap_or_default(), platform)
    }

    pub fn is_native(&self) -> bool {
        matches!(&self.natives, Some(value) if !value.is_null())
    }
}

impl VersionJson {
    /// Parse a version manifest from disk.
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        crate::core::cache::read_json(path).await
    }

    pub fn require_main_class(&self, path: &Path) -> LauncherResult<&str> {
        required(self.main_class.as_deref(), "mainClass", path)
    }

    pub fn require_assets(&self, path: &Path) -> LauncherResult<&str> {
        required(self.assets.as_deref(), "assets", path)
    }

    pub fn require_arguments(&self, path: &Path) -> LauncherResult<&str> {
        required(self.minecraft_arguments.as_deref(), "minecraftArguments", path)
    }

    /// Expected hash of the main archive; an absent field never verifies.
    pub fn jar_hash(&self) -> &str {
        self.jar_hash.as_deref().unwrap_or_default()
    }

    /// Parsed `releaseTime`, if present and well formed.
    pub fn release_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.release_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
    }
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    path: &Path,
) -> LauncherResult<&'a str> {
    value.ok_or_else(|| LauncherError::MissingField {
        field,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Platform = Platform::Osx;

    #[test]
    fn no_rules_means_allowed() {
        for platform in [Platform::Windows, Platform::Osx, Platform::Linux] {
            assert!(rules_allow(&[], platform));
        }
    }

    #[test]
    fn plain_allow_applies_everywhere() {
        for platform in [Platform::Windows, Platform::Osx, Platform::Linux] {
            assert!(rules_allow(&[LibraryRule::allow()], platform));
        }
    }

    #[test]
    fn later_disallow_overrides_allow() {
        let rules = [LibraryRule::allow(), LibraryRule::disallow_on("osx")];
        assert!(!rules_allow(&rules, X));
        assert!(rules_allow(&rules, Platform::Linux));
    }

    #[test]
    fn declaration_order_decides_not_rule_type() {
        let rules = [LibraryRule::disallow_on("osx"), LibraryRule::allow()];
        assert!(rules_allow(&rules, X));
    }

    #[test]
    fn allow_for_other_os_only_is_disallowed() {
        let rules = [LibraryRule::allow_on("windows")];
        assert!(!rules_allow(&rules, Platform::Linux));
        assert!(rules_allow(&rules, Platform::Windows));
    }

    #[test]
    fn disallow_without_os_name_is_ignored() {
        let rules = [
            LibraryRule::allow(),
            LibraryRule {
                action: RuleAction::Disallow,
                os: None,
            },
        ];
        assert!(rules_allow(&rules, Platform::Linux));
    }

    #[test]
    fn allow_with_empty_os_object_applies_everywhere() {
        let rules: Vec<LibraryRule> =
            serde_json::from_str(r#"[{"action": "allow", "os": {}}]"#).unwrap();
        assert!(rules_allow(&rules, Platform::Windows));
    }

    #[test]
    fn allow_with_other_os_predicates_only_is_a_no_op() {
        let rules: Vec<LibraryRule> =
            serde_json::from_str(r#"[{"action": "allow", "os": {"arch": "x86"}}]"#).unwrap();
        for platform in [Platform::Windows, Platform::Osx, Platform::Linux] {
            assert!(!rules_allow(&rules, platform));
        }

        let rules: Vec<LibraryRule> = serde_json::from_str(
            r#"[{"action": "allow"}, {"action": "allow", "os": {"arch": "x86"}}]"#,
        )
        .unwrap();
        assert!(rules_allow(&rules, Platform::Linux));
    }

    #[test]
    fn unknown_actions_parse_and_are_ignored() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "libraries": [{
                "name": "org.example:foo:1.0",
                "rules": [
                    {"action": "allow"},
                    {"action": "ignore", "os": {"name": "linux"}}
                ]
            }]
        }))
        .unwrap();

        let rules = parsed.libraries[0].rules.as_deref().unwrap();
        assert_eq!(rules[1].action, RuleAction::Unknown);
        assert!(parsed.libraries[0].is_allowed_on(Platform::Linux));

        let only_unknown: Vec<LibraryRule> =
            serde_json::from_str(r#"[{"action": "ignore"}]"#).unwrap();
        assert!(!rules_allow(&only_unknown, Platform::Linux));
    }

    #[test]
    fn parses_manifest_document() {
        let parsed: VersionJson = serde_json::from_value(serde_json::json!({
            "id": "1.7.10",
            "mainClass": "net.minecraft.client.main.Main",
            "minecraftArguments": "--username ${auth_player_name}",
            "assets": "1.7.10",
            "customFiles": true,
            "jarHash": "ABCDEF",
            "releaseTime": "2014-05-14T17:29:23+00:00",
            "libraries": [
                {"name": "org.example:foo:1.0"},
                {
                    "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.1",
                    "natives": {"linux": "natives-linux", "windows": "natives-windows"},
                    "rules": [
                        {"action": "allow"},
                        {"action": "disallow", "os": {"name": "osx"}}
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(parsed.libraries.len(), 2);
        assert!(!parsed.libraries[0].is_native());
        assert!(parsed.libraries[1].is_native());
        assert!(parsed.libraries[1].is_allowed_on(Platform::Linux));
        assert!(!parsed.libraries[1].is_allowed_on(Platform::Osx));
        assert!(parsed.custom_files);
        assert_eq!(parsed.jar_hash(), "ABCDEF");
        assert!(parsed.release_timestamp().is_some());
    }

    #[test]
    fn missing_launch_fields_are_reported_by_name() {
        let parsed: VersionJson = serde_json::from_str(r#"{"libraries": []}"#).unwrap();
        let path = Path::new("versions/x/x.json");

        let err = parsed.require_main_class(path).unwrap_err();
        assert!(matches!(err, LauncherError::MissingField { field: "mainClass", .. }));
        assert!(parsed.require_assets(path).is_err());
        assert!(parsed.require_arguments(path).is_err());
        assert!(!parsed.custom_files);
        assert_eq!(parsed.jar_hash(), "");
    }

    #[test]
    fn invalid_release_time_is_ignored() {
        let parsed: VersionJson =
            serde_json::from_str(r#"{"releaseTime": "yesterday"}"#).unwrap();
        assert!(parsed.release_timestamp().is_none());
    }
}
