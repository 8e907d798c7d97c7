pub mod arguments;
pub mod classpath;
pub mod orchestrator;
pub mod task;

pub use arguments::{expand_template, LaunchContext, LaunchContextBuilder, TemplateBindings};
pub use classpath::{build_classpath, extract_natives, prepare_natives_dir, ClasspathPlan};
pub use orchestrator::{
    LaunchLock, LaunchObserver, LaunchOrchestrator, LaunchReport, LaunchRequest, LaunchStage,
    NoopObserver,
};
pub use task::{OutputSink, OutputWatch, ProcessError, ProcessResult, TracingSink, WatchEvent};
