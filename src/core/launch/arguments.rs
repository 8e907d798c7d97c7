// ─── Launch Arguments ───
// Expands the manifest's argument template and composes the full command line.

use std::path::{Path, PathBuf};

use super::classpath::safe_path_str;

const USER_PROPERTIES: &str = "{}";
const USER_TYPE: &str = "mojang";

/// Runtime values for the recognized `${...}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct TemplateBindings {
    pub player_name: String,
    pub version_name: String,
    pub game_directory: String,
    pub assets_root: String,
    pub assets_index_name: String,
    pub uuid: String,
    pub access_token: String,
}

impl TemplateBindings {
    fn pairs(&self) -> [(&'static str, &str); 9] {
        [
            ("${auth_player_name}", &self.player_name),
            ("${version_name}", &self.version_name),
            ("${game_directory}", &self.game_directory),
            ("${assets_root}", &self.assets_root),
            ("${assets_index_name}", &self.assets_index_name),
            ("${auth_uuid}", &self.uuid),
            ("${auth_access_token}", &self.access_token),
            ("${user_properties}", USER_PROPERTIES),
            ("${user_type}", USER_TYPE),
        ]
    }
}

/// Split `template` on whitespace and substitute known placeholders.
///
/// Unknown placeholders are kept as written.
pub fn expand_template(template: &str, bindings: &TemplateBindings) -> Vec<String> {
    let pairs = bindings.pairs();
    template
        .split_whitespace()
        .map(|token| {
            pairs
                .iter()
                .fold(token.to_string(), |acc, (key, value)| acc.replace(*key, value))
        })
        .collect()
}

/// Everything needed to start the game process.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub interpreter: PathBuf,
    pub classpath: String,
    pub natives_dir: PathBuf,
    pub main_class: String,
    /// Full argument vector, interpreter flags first.
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

pub struct LaunchContextBuilder<'a> {
    pub interpreter: PathBuf,
    pub trust_store: &'a Path,
    pub trust_store_password: &'a str,
    pub extra_flags: Option<&'a str>,
    pub natives_dir: PathBuf,
    pub classpath: String,
    pub main_class: &'a str,
    pub working_dir: PathBuf,
}

impl LaunchContextBuilder<'_> {
    /// Compose interpreter flags, classpath, main class and the templated
    /// game arguments, in that order.
    pub fn build(self, game_args: Vec<String>) -> LaunchContext {
        let mut args = vec![
            format!("-Djavax.net.ssl.trustStore={}", safe_path_str(self.trust_store)),
            format!("-Djavax.net.ssl.trustStorePassword={}", self.trust_store_password),
        ];

        if let Some(extra) = self.extra_flags {
            args.extend(extra.split_whitespace().map(str::to_string));
        }

        args.push(format!(
            "-Djava.library.path={}",
            safe_path_str(&self.natives_dir)
        ));
        args.push("-cp".into());
        args.push(self.classpath.clone());
        args.push(self.main_class.to_string());
        args.extend(game_args);

        LaunchContext {
            interpreter: self.interpreter,
            classpath: self.classpath,
            natives_dir: self.natives_dir,
            main_class: self.main_class.to_string(),
            args,
            working_dir: self.working_dir,
        }
    }
}
