// ─── ttyhlauncher Core ───
// Verifies a cached game version and launches it.
//
// Architecture:
//   core/
//     version/    — Manifests, library/custom-file indexes, rules, `latest` alias
//     maven/      — Coordinate parser and repository paths
//     cache/      — Data directory layout and JSON loading
//     integrity   — SHA-1 file verification
//     assets/     — Asset index verification
//     downloader/ — Index refresh from the update server
//     launch/     — Classpath, arguments, process supervision, orchestration
//     auth/       — Session handed over by the authenticator
//     state/      — Settings and shared handles

pub mod assets;
pub mod auth;
pub mod cache;
pub mod downloader;
pub mod error;
pub mod http;
pub mod integrity;
pub mod launch;
pub mod logging;
pub mod maven;
pub mod platform;
pub mod state;
pub mod version;
