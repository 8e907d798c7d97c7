// ─── Launch Orchestrator ───
// Runs one launch attempt end to end: alias, indexes, verification,
// arguments, process. Every failing step ends the attempt.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::arguments::{expand_template, LaunchContext, LaunchContextBuilder, TemplateBindings};
use super::classpath::{build_classpath, extract_natives, prepare_natives_dir, safe_path_str};
use super::task::{self, ProcessError, ProcessResult, TracingSink};
use crate::core::assets::AssetIndex;
use crate::core::auth::Session;
use crate::core::cache::{join_relative, CacheLayout};
use crate::core::downloader::{Downloader, IndexFetcher};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::integrity;
use crate::core::logging;
use crate::core::platform::Platform;
use crate::core::state::{AppState, LauncherSettings};
use crate::core::version::{
    resolve_version, AliasResolver, CustomFileIndex, LibraryIndex, OfflineAliasResolver,
    OnlineAliasResolver, VersionJson,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Idle,
    ResolvingAlias,
    FetchingManifests,
    VerifyingLibraries,
    VerifyingAssets,
    VerifyingCustomFiles,
    BuildingArguments,
    Launching,
    Supervising,
    Succeeded,
    Failed,
}

/// Outcome of a launch attempt as shown to the user.
#[derive(Debug)]
pub enum LaunchReport {
    Success,
    /// A cached file or index is missing or damaged; run the updater.
    UpdateRequired { reason: String },
    /// The client ran and exited with a nonzero code.
    AbnormalExit { code: i32, log_path: PathBuf },
    ProcessFailed(ProcessError),
    Failed(LauncherError),
}

impl LaunchReport {
    pub fn is_success(&self) -> bool {
        matches!(self, LaunchReport::Success)
    }

    /// Process exit code for the CLI: 0 success, 2 update required, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            LaunchReport::Success => 0,
            LaunchReport::UpdateRequired { .. } => 2,
            _ => 1,
        }
    }

    fn from_error(err: LauncherError) -> Self {
        if err.requires_update() {
            LaunchReport::UpdateRequired {
                reason: err.to_string(),
            }
        } else {
            LaunchReport::Failed(err)
        }
    }
}

/// UI hooks notified while an attempt runs.
pub trait LaunchObserver: Send + Sync {
    fn stage_changed(&self, _stage: LaunchStage) {}

    /// Hide the launcher once the client is up; show it again when the
    /// client ends abnormally.
    fn set_foreground_visible(&self, _visible: bool) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl LaunchObserver for NoopObserver {}

/// At most one launch attempt in flight.
#[derive(Debug, Default)]
pub struct LaunchLock {
    busy: AtomicBool,
}

pub struct LaunchGuard<'a> {
    lock: &'a LaunchLock,
}

impl LaunchLock {
    pub fn try_acquire(&self) -> LauncherResult<LaunchGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LauncherError::LaunchInProgress)?;
        Ok(LaunchGuard { lock: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for LaunchGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Concrete version id or the `latest` alias.
    pub version: String,
    pub player_name: String,
    pub session: Session,
}

pub struct LaunchOrchestrator {
    layout: CacheLayout,
    settings: LauncherSettings,
    platform: Platform,
    fetcher: Arc<dyn IndexFetcher>,
    online_resolver: Arc<dyn AliasResolver>,
    offline_resolver: Arc<dyn AliasResolver>,
    lock: LaunchLock,
    log_path: PathBuf,
}

impl LaunchOrchestrator {
    pub fn new(
        layout: CacheLayout,
        settings: LauncherSettings,
        platform: Platform,
        fetcher: Arc<dyn IndexFetcher>,
        online_resolver: Arc<dyn AliasResolver>,
    ) -> Self {
        Self {
            offline_resolver: Arc::new(OfflineAliasResolver::new(layout.clone())),
            log_path: logging::log_file_path(&layout.logs_dir()),
            layout,
            settings,
            platform,
            fetcher,
            online_resolver,
            lock: LaunchLock::default(),
        }
    }

    /// Orchestrator wired to the update server configured in `state`.
    pub fn from_state(state: &AppState) -> Self {
        let settings = state.launcher_settings.clone();
        let online = OnlineAliasResolver::new(state.http_client.clone(), settings.pointer_url());
        Self::new(
            state.layout.clone(),
            settings,
            Platform::current(),
            Arc::new(Downloader::new(state.http_client.clone())),
            Arc::new(online),
        )
    }

    pub fn lock(&self) -> &LaunchLock {
        &self.lock
    }

    /// Resolver used for `latest` in the given session mode.
    pub fn resolver_for(&self, session: &Session) -> Arc<dyn AliasResolver> {
        if session.is_online() {
            self.online_resolver.clone()
        } else {
            self.offline_resolver.clone()
        }
    }

    /// Run one launch attempt and report how it ended.
    pub async fn launch(
        &self,
        request: &LaunchRequest,
        observer: &dyn LaunchObserver,
    ) -> LaunchReport {
        let _guard = match self.lock.try_acquire() {
            Ok(guard) => guard,
            Err(e) => {
                warn!("Launch rejected: {}", e);
                return LaunchReport::Failed(e);
            }
        };

        let span = info_span!("launch", id = %Uuid::new_v4());
        async {
            info!(
                "Launch requested: version={} player={} online={}",
                request.version,
                request.player_name,
                request.session.is_online()
            );

            let report = match self.prepare(request, observer).await {
                Ok(ctx) => self.supervise(&ctx, observer).await,
                Err(e) => {
                    error!("Launch aborted: {}", e);
                    LaunchReport::from_error(e)
                }
            };

            observer.stage_changed(if report.is_success() {
                LaunchStage::Succeeded
            } else {
                LaunchStage::Failed
            });
            report
        }
        .instrument(span)
        .await
    }

    async fn prepare(
        &self,
        request: &LaunchRequest,
        observer: &dyn LaunchObserver,
    ) -> LauncherResult<LaunchContext> {
        let online = request.session.is_online();

        observer.stage_changed(LaunchStage::ResolvingAlias);
        let resolver = self.resolver_for(&request.session);
        let version = resolve_version(&request.version, resolver.as_ref()).await?;

        observer.stage_changed(LaunchStage::FetchingManifests);
        let manifest_path = self.layout.version_manifest(&version);
        if online {
            self.refresh(&format!("{}.json", version), &version, &manifest_path)
                .await;
            self.refresh("libs.json", &version, &self.layout.library_index(&version))
                .await;
        }
        let manifest = VersionJson::load(&manifest_path).await?;
        if online {
            self.refresh_dependent_indexes(&version, &manifest).await;
        }
        let libraries = LibraryIndex::load(&self.layout.library_index(&version)).await?;

        observer.stage_changed(LaunchStage::VerifyingLibraries);
        let natives_dir = self.layout.natives_dir();
        prepare_natives_dir(&natives_dir).await?;
        let plan =
            build_classpath(&manifest, &libraries, &self.layout, &version, self.platform).await?;
        extract_natives(&plan.native_archives, &natives_dir).await?;

        observer.stage_changed(LaunchStage::VerifyingAssets);
        let assets = manifest.require_assets(&manifest_path)?;
        AssetIndex::load(&self.layout.asset_index(assets))
            .await?
            .verify_objects(&self.layout)
            .await?;

        let game_dir = self.layout.game_dir(&version);
        if manifest.custom_files {
            observer.stage_changed(LaunchStage::VerifyingCustomFiles);
            self.verify_custom_files(&version, &game_dir).await?;
        }

        observer.stage_changed(LaunchStage::BuildingArguments);
        let main_class = manifest.require_main_class(&manifest_path)?;
        let template = manifest.require_arguments(&manifest_path)?;

        let bindings = TemplateBindings {
            player_name: request.player_name.clone(),
            version_name: version.clone(),
            game_directory: safe_path_str(&game_dir),
            assets_root: safe_path_str(&self.layout.assets_dir()),
            assets_index_name: assets.to_string(),
            uuid: request.session.uuid.clone(),
            access_token: request.session.access_token.clone(),
        };

        let trust_store = self.layout.trust_store();
        let ctx = LaunchContextBuilder {
            interpreter: self.settings.interpreter(),
            trust_store: &trust_store,
            trust_store_password: &self.settings.trust_store_password,
            extra_flags: self.settings.java_args.as_deref(),
            natives_dir,
            classpath: plan.classpath,
            main_class,
            working_dir: game_dir,
        }
        .build(expand_template(template, &bindings));

        Ok(ctx)
    }

    async fn supervise(&self, ctx: &LaunchContext, observer: &dyn LaunchObserver) -> LaunchReport {
        observer.stage_changed(LaunchStage::Launching);

        let mut started = false;
        let mut sink = TracingSink::default();
        let result = task::run(ctx, &mut sink, || {
            started = true;
            observer.stage_changed(LaunchStage::Supervising);
            observer.set_foreground_visible(false);
        })
        .await;
        drop(sink);

        if started && !result.is_success() {
            observer.set_foreground_visible(true);
        }

        match result {
            ProcessResult::Exited(0) => {
                info!("Client finished normally");
                LaunchReport::Success
            }
            ProcessResult::Exited(code) => {
                error!(
                    "Client exited with code {}, see {}",
                    code,
                    self.log_path.display()
                );
                LaunchReport::AbnormalExit {
                    code,
                    log_path: self.log_path.clone(),
                }
            }
            ProcessResult::Failed(e) => {
                error!("Client process failed: {}", e);
                LaunchReport::ProcessFailed(e)
            }
        }
    }

    async fn verify_custom_files(&self, version: &str, game_dir: &Path) -> LauncherResult<()> {
        let index = CustomFileIndex::load(&self.layout.custom_files_index(version)).await?;
        let mut checked = 0usize;
        for (relative, hash) in index.expectations() {
            integrity::ensure_valid(&join_relative(game_dir, relative), hash).await?;
            checked += 1;
        }
        info!("Verified {} custom files", checked);
        Ok(())
    }

    async fn refresh_dependent_indexes(&self, version: &str, manifest: &VersionJson) {
        if manifest.custom_files {
            self.refresh("files.json", version, &self.layout.custom_files_index(version))
                .await;
        }
        if let Some(assets) = manifest.assets.as_deref() {
            let url = self.settings.asset_index_url(assets);
            self.fetch_best_effort(&url, &self.layout.asset_index(assets))
                .await;
        }
    }

    async fn refresh(&self, file: &str, version: &str, dest: &Path) {
        let url = self.settings.version_file_url(version, file);
        self.fetch_best_effort(&url, dest).await;
    }

    async fn fetch_best_effort(&self, url: &str, dest: &Path) {
        if let Err(e) = self.fetcher.fetch_to(url, dest).await {
            warn!("Could not refresh {}: {}; using cached copy", url, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sha1::{Digest, Sha1};
    use std::sync::Mutex;

    const VERSION: &str = "1.7.10";

    fn sha(bytes: &[u8]) -> String {
        hex::encode(Sha1::digest(bytes))
    }

    fn write(path: &Path, bytes: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    /// A fully valid cache for one version.
    struct CacheFixture {
        layout: CacheLayout,
    }

    impl CacheFixture {
        fn new(name: &str) -> Self {
            let root =
                std::env::temp_dir().join(format!("orchestrator-{}-{}", name, std::process::id()));
            let _ = std::fs::remove_dir_all(&root);
            let layout = CacheLayout::new(root);

            let lib_path = "org/example/foo/1.0/foo-1.0.jar";
            write(&layout.library_file(lib_path), b"foo");
            write(
                &layout.library_index(VERSION),
                serde_json::json!({"objects": {lib_path: {"hash": sha(b"foo")}}})
                    .to_string()
                    .as_bytes(),
            );

            write(&layout.version_jar(VERSION), b"game");
            write(
                &layout.version_manifest(VERSION),
                serde_json::json!({
                    "id": VERSION,
                    "mainClass": "net.minecraft.client.main.Main",
                    "minecraftArguments": "--username ${auth_player_name} --version ${version_name} --uuid ${auth_uuid} --accessToken ${auth_access_token}",
                    "assets": "legacy",
                    "customFiles": true,
                    "jarHash": sha(b"game"),
                    "releaseTime": "2014-06-24T10:00:00+00:00",
                    "libraries": [{"name": "org.example:foo:1.0"}]
                })
                .to_string()
                .as_bytes(),
            );

            write(&layout.asset_object(&sha(b"click")), b"click");
            write(
                &layout.asset_index("legacy"),
                serde_json::json!({"objects": {"sounds/click.ogg": {"hash": sha(b"click")}}})
                    .to_string()
                    .as_bytes(),
            );

            let game_dir = layout.game_dir(VERSION);
            write(&game_dir.join("mods/core.jar"), b"mod");
            write(&game_dir.join("options.txt"), b"user edited");
            write(
                &layout.custom_files_index(VERSION),
                serde_json::json!({
                    "objects": {
                        "mods/core.jar": {"hash": sha(b"mod")},
                        "options.txt": {"hash": sha(b"original")}
                    },
                    "mutable": ["options.txt"]
                })
                .to_string()
                .as_bytes(),
            );

            Self { layout }
        }

        /// Script standing in for the interpreter.
        #[cfg(unix)]
        fn fake_java(&self, body: &str) -> PathBuf {
            use std::os::unix::fs::PermissionsExt;

            let path = self.layout.root().join("bin").join("java");
            write(&path, format!("#!/bin/sh\n{}\n", body).as_bytes());
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn orchestrator(&self, java: Option<PathBuf>, fetcher: Arc<RecordingFetcher>) -> LaunchOrchestrator {
            let settings = LauncherSettings {
                java_path: Some(java.unwrap_or_else(|| self.layout.root().join("no-java"))),
                update_server: "http://updates.test".into(),
                client: "classic".into(),
                ..LauncherSettings::default()
            };
            LaunchOrchestrator::new(
                self.layout.clone(),
                settings,
                Platform::Linux,
                fetcher,
                Arc::new(FixedResolver(VERSION)),
            )
        }
    }

    impl Drop for CacheFixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(self.layout.root());
        }
    }

    struct FixedResolver(&'static str);

    #[async_trait]
    impl AliasResolver for FixedResolver {
        async fn resolve_latest(&self) -> LauncherResult<String> {
            Ok(self.0.to_string())
        }
    }

    /// Records requested urls and fails every fetch.
    #[derive(Default)]
    struct RecordingFetcher {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IndexFetcher for RecordingFetcher {
        async fn fetch_to(&self, url: &str, _dest: &Path) -> LauncherResult<()> {
            self.urls.lock().unwrap().push(url.to_string());
            Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        stages: Mutex<Vec<LaunchStage>>,
        visibility: Mutex<Vec<bool>>,
    }

    impl LaunchObserver for RecordingObserver {
        fn stage_changed(&self, stage: LaunchStage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn set_foreground_visible(&self, visible: bool) {
            self.visibility.lock().unwrap().push(visible);
        }
    }

    fn offline_request(version: &str) -> LaunchRequest {
        LaunchRequest {
            version: version.into(),
            player_name: "Bob".into(),
            session: Session::offline(),
        }
    }

    #[test]
    fn reports_map_to_exit_codes() {
        assert_eq!(LaunchReport::Success.exit_code(), 0);
        assert_eq!(
            LaunchReport::UpdateRequired {
                reason: "stale".into()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            LaunchReport::AbnormalExit {
                code: 7,
                log_path: PathBuf::from("launcher.log")
            }
            .exit_code(),
            1
        );
        assert_eq!(
            LaunchReport::Failed(LauncherError::LaunchInProgress).exit_code(),
            1
        );
    }

    #[tokio::test]
    async fn mismatched_library_requires_update_before_spawn() {
        let fx = CacheFixture::new("mismatch");
        let lib = fx.layout.library_file("org/example/foo/1.0/foo-1.0.jar");
        std::fs::write(&lib, b"tampered").unwrap();
        let modified = std::fs::metadata(&lib).unwrap().modified().unwrap();

        let orchestrator = fx.orchestrator(None, Arc::default());
        let observer = RecordingObserver::default();
        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        assert!(matches!(report, LaunchReport::UpdateRequired { .. }));
        assert_eq!(std::fs::read(&lib).unwrap(), b"tampered");
        assert_eq!(std::fs::metadata(&lib).unwrap().modified().unwrap(), modified);

        let stages = observer.stages.lock().unwrap();
        assert!(!stages.contains(&LaunchStage::Launching));
        assert_eq!(stages.last(), Some(&LaunchStage::Failed));
        assert!(observer.visibility.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn changed_custom_file_requires_update_before_spawn() {
        let fx = CacheFixture::new("custom-mismatch");
        let modded = fx.layout.game_dir(VERSION).join("mods/core.jar");
        std::fs::write(&modded, b"patched by hand").unwrap();

        let orchestrator = fx.orchestrator(None, Arc::default());
        let observer = RecordingObserver::default();
        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        assert!(matches!(report, LaunchReport::UpdateRequired { .. }));
        assert_eq!(std::fs::read(&modded).unwrap(), b"patched by hand");
        let stages = observer.stages.lock().unwrap();
        assert!(stages.contains(&LaunchStage::VerifyingCustomFiles));
        assert!(!stages.contains(&LaunchStage::Launching));
    }

    #[tokio::test]
    async fn absent_mutable_custom_file_requires_update() {
        let fx = CacheFixture::new("custom-mutable");
        std::fs::remove_file(fx.layout.game_dir(VERSION).join("options.txt")).unwrap();

        let orchestrator = fx.orchestrator(None, Arc::default());
        let observer = RecordingObserver::default();
        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        match report {
            LaunchReport::UpdateRequired { reason } => assert!(reason.contains("options.txt")),
            other => panic!("unexpected report: {other:?}"),
        }
        assert!(!observer.stages.lock().unwrap().contains(&LaunchStage::Launching));
    }

    #[tokio::test]
    async fn custom_files_stage_is_skipped_when_flag_is_off() {
        let fx = CacheFixture::new("custom-off");
        let manifest_path = fx.layout.version_manifest(VERSION);
        let mut manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&manifest_path).unwrap()).unwrap();
        manifest["customFiles"] = serde_json::Value::Bool(false);
        std::fs::write(&manifest_path, manifest.to_string()).unwrap();
        std::fs::remove_file(fx.layout.custom_files_index(VERSION)).unwrap();
        std::fs::write(fx.layout.game_dir(VERSION).join("mods/core.jar"), b"anything").unwrap();

        // No interpreter: the attempt gets past verification and fails to spawn.
        let orchestrator = fx.orchestrator(None, Arc::default());
        let observer = RecordingObserver::default();
        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        assert!(matches!(
            report,
            LaunchReport::ProcessFailed(ProcessError::FailedToStart { .. })
        ));
        let stages = observer.stages.lock().unwrap();
        assert!(!stages.contains(&LaunchStage::VerifyingCustomFiles));
        assert!(stages.contains(&LaunchStage::BuildingArguments));
        assert!(stages.contains(&LaunchStage::Launching));
    }

    #[tokio::test]
    async fn missing_asset_object_requires_update() {
        let fx = CacheFixture::new("asset");
        std::fs::remove_file(fx.layout.asset_object(&sha(b"click"))).unwrap();

        let orchestrator = fx.orchestrator(None, Arc::default());
        let report = orchestrator
            .launch(&offline_request(VERSION), &NoopObserver)
            .await;
        assert!(matches!(report, LaunchReport::UpdateRequired { .. }));
    }

    #[tokio::test]
    async fn missing_manifest_requires_update() {
        let fx = CacheFixture::new("no-manifest");
        let orchestrator = fx.orchestrator(None, Arc::default());
        let report = orchestrator
            .launch(&offline_request("1.12.2"), &NoopObserver)
            .await;
        assert!(matches!(report, LaunchReport::UpdateRequired { .. }));
    }

    #[tokio::test]
    async fn second_launch_is_rejected_while_one_is_in_flight() {
        let fx = CacheFixture::new("lock");
        let orchestrator = fx.orchestrator(None, Arc::default());

        let guard = orchestrator.lock().try_acquire().unwrap();
        let report = orchestrator
            .launch(&offline_request(VERSION), &NoopObserver)
            .await;
        assert!(matches!(
            report,
            LaunchReport::Failed(LauncherError::LaunchInProgress)
        ));

        drop(guard);
        assert!(!orchestrator.lock().is_busy());
    }

    #[tokio::test]
    async fn missing_interpreter_is_a_process_failure() {
        let fx = CacheFixture::new("no-java");
        let orchestrator = fx.orchestrator(None, Arc::default());
        let observer = RecordingObserver::default();

        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        assert!(matches!(
            report,
            LaunchReport::ProcessFailed(ProcessError::FailedToStart { .. })
        ));
        assert!(observer.visibility.lock().unwrap().is_empty());
        assert!(!orchestrator.lock().is_busy());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn offline_latest_launches_with_composed_arguments() {
        let fx = CacheFixture::new("success");
        let args_file = fx.layout.root().join("args.txt");
        let java = fx.fake_java(&format!(
            "printf '%s\\n' \"$@\" > '{}'\npwd >> '{}'",
            args_file.display(),
            args_file.display()
        ));
        let fetcher = Arc::new(RecordingFetcher::default());
        let orchestrator = fx.orchestrator(Some(java), fetcher.clone());
        let observer = RecordingObserver::default();

        let report = orchestrator.launch(&offline_request("latest"), &observer).await;

        assert!(report.is_success(), "unexpected report: {report:?}");
        assert!(fetcher.urls.lock().unwrap().is_empty());
        assert_eq!(*observer.visibility.lock().unwrap(), vec![false]);
        assert_eq!(
            *observer.stages.lock().unwrap(),
            vec![
                LaunchStage::ResolvingAlias,
                LaunchStage::FetchingManifests,
                LaunchStage::VerifyingLibraries,
                LaunchStage::VerifyingAssets,
                LaunchStage::VerifyingCustomFiles,
                LaunchStage::BuildingArguments,
                LaunchStage::Launching,
                LaunchStage::Supervising,
                LaunchStage::Succeeded,
            ]
        );

        let written = std::fs::read_to_string(&args_file).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines[0].starts_with("-Djavax.net.ssl.trustStore="));
        assert_eq!(lines[1], "-Djavax.net.ssl.trustStorePassword=123456");
        assert!(lines[2].starts_with("-Djava.library.path="));
        assert_eq!(lines[3], "-cp");
        assert!(lines[4].ends_with("versions/1.7.10/1.7.10.jar"));
        assert_eq!(lines[5], "net.minecraft.client.main.Main");
        assert_eq!(
            &lines[6..14],
            &[
                "--username",
                "Bob",
                "--version",
                "1.7.10",
                "--uuid",
                "HARD",
                "--accessToken",
                "CORE"
            ]
        );
        assert!(lines[14].ends_with("prefix/1.7.10"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_reports_log_and_shows_launcher_again() {
        let fx = CacheFixture::new("abnormal");
        let java = fx.fake_java("echo boom 1>&2\nexit 7");
        let orchestrator = fx.orchestrator(Some(java), Arc::default());
        let observer = RecordingObserver::default();

        let report = orchestrator.launch(&offline_request(VERSION), &observer).await;

        match report {
            LaunchReport::AbnormalExit { code, log_path } => {
                assert_eq!(code, 7);
                assert_eq!(log_path, logging::log_file_path(&fx.layout.logs_dir()));
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(*observer.visibility.lock().unwrap(), vec![false, true]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn online_refresh_failures_fall_back_to_cache() {
        let fx = CacheFixture::new("online");
        let java = fx.fake_java("exit 0");
        let fetcher = Arc::new(RecordingFetcher::default());
        let orchestrator = fx.orchestrator(Some(java), fetcher.clone());

        let request = LaunchRequest {
            version: "latest".into(),
            player_name: "Bob".into(),
            session: Session::online("1234", "token"),
        };
        let report = orchestrator.launch(&request, &NoopObserver).await;

        assert!(report.is_success(), "unexpected report: {report:?}");
        assert_eq!(
            *fetcher.urls.lock().unwrap(),
            vec![
                "http://updates.test/classic/1.7.10/1.7.10.json",
                "http://updates.test/classic/1.7.10/libs.json",
                "http://updates.test/classic/1.7.10/files.json",
                "http://updates.test/assets/indexes/legacy.json",
            ]
        );
    }
}
