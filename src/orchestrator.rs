//! Staging orchestrator: clone → build → harvest → mark, once per invocation.

use crate::config::BuildConfig;
use crate::domain::{ArtifactFilter, ArtifactSet, AssemblyPhase, MarkerNaming, Project, Tag};
use crate::error::{AppError, Result};
use crate::services::{
    build_options, BuildService, GitService, LibraryDirectory, ProcessRunner, ToolBinding,
    ToolLocator,
};
use std::path::{Path, PathBuf};

/// Directory the build tool writes its outputs to, relative to the sub-project
pub const BUILD_OUTPUT_DIR: &str = "target";

/// Everything the orchestrator needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub repository: String,
    pub subproject: String,
    pub staging_directory: PathBuf,
    pub lib_directory: PathBuf,
    pub artifact: ArtifactFilter,
    pub marker: MarkerNaming,
    pub build: BuildConfig,
    /// git executable name or path
    pub git_tool: String,
    /// build tool executable name or path
    pub build_tool: String,
    pub stderr_tail_lines: usize,
}

impl OrchestratorSettings {
    /// Settings for a project's layout and configuration
    pub fn from_project(project: &Project) -> Self {
        let config = &project.config;
        Self {
            repository: config.source.repository.clone(),
            subproject: config.source.subproject.clone(),
            staging_directory: project.staging_directory.clone(),
            lib_directory: project.lib_directory.clone(),
            artifact: ArtifactFilter::new(&config.artifact.prefix, &config.artifact.suffix),
            marker: MarkerNaming::new(&config.marker.prefix, &config.marker.client_suffix),
            build: config.build.clone(),
            git_tool: config.tools.git.clone(),
            build_tool: config.tools.mvn.clone(),
            stderr_tail_lines: config.process.stderr_tail_lines,
        }
    }
}

/// What to assemble
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    pub tag: Tag,
    /// Include the Hadoop dependency profile in the jar
    pub client_mode: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub tag: Tag,
    pub client_mode: bool,
    pub staged_path: PathBuf,
    /// Files removed from the library directory before staging
    pub removed: Vec<PathBuf>,
    pub artifacts: ArtifactSet,
    pub marker: PathBuf,
}

/// Drives one assembly run
pub struct StagingOrchestrator {
    settings: OrchestratorSettings,
    git: GitService,
    builder: BuildService,
    phase: AssemblyPhase,
}

impl StagingOrchestrator {
    /// Resolve the external tools; fails before touching the filesystem if one is missing
    pub fn new(settings: OrchestratorSettings, locator: &ToolLocator) -> Result<Self> {
        ensure_supported_platform()?;

        let mut phase = AssemblyPhase::Init;
        let git = Self::resolve_tool(locator, &settings.git_tool)?;
        let mvn = Self::resolve_tool(locator, &settings.build_tool)?;
        phase.advance(AssemblyPhase::ToolsResolved)?;

        let runner = ProcessRunner::new(settings.stderr_tail_lines);
        Ok(Self {
            git: GitService::new(git, runner.clone()),
            builder: BuildService::new(mvn, runner),
            settings,
            phase,
        })
    }

    /// Look up an executable on the command search path
    pub fn resolve_tool(locator: &ToolLocator, name: &str) -> Result<ToolBinding> {
        let binding = locator.resolve(name)?;
        tracing::info!("Using {} at {}", binding.name, binding.path.display());
        Ok(binding)
    }

    pub fn phase(&self) -> AssemblyPhase {
        self.phase
    }

    /// Clone `tag` of `repository` into `destination_root/tag` unless already there
    pub fn stage(&self, repository: &str, tag: &Tag, destination_root: &Path) -> Result<PathBuf> {
        Ok(self.git.stage(repository, tag, destination_root)?)
    }

    /// Run `clean package` with `extra_options` over `subproject_directory`
    pub fn build(&self, subproject_directory: &Path, extra_options: &[String]) -> Result<()> {
        Ok(self.builder.package(subproject_directory, extra_options)?)
    }

    /// Copy the matching outputs of `build_output` into `destination`
    pub fn harvest(
        &self,
        build_output: &Path,
        filter: &ArtifactFilter,
        destination: &Path,
    ) -> Result<ArtifactSet> {
        let library = LibraryDirectory::open(destination)?;
        Ok(library.harvest(build_output, filter)?)
    }

    /// Create the completion marker for `(tag, client_mode)` in `destination`
    pub fn mark(&self, destination: &Path, tag: &Tag, client_mode: bool) -> Result<PathBuf> {
        let library = LibraryDirectory::open(destination)?;
        Ok(library.mark(&self.settings.marker, tag, client_mode)?)
    }

    /// Run the whole workflow. Any failure leaves the orchestrator in `Failed`.
    pub fn run(&mut self, request: &AssemblyRequest) -> Result<AssemblyReport> {
        let result = self.run_phases(request);
        if let Err(e) = &result {
            tracing::debug!("Run failed in phase {}: {}", self.phase, e);
            if self.phase.can_transition_to(AssemblyPhase::Failed) {
                self.phase = AssemblyPhase::Failed;
            }
        }
        result
    }

    fn run_phases(&mut self, request: &AssemblyRequest) -> Result<AssemblyReport> {
        if self.phase != AssemblyPhase::ToolsResolved {
            return Err(AppError::PhaseTransition {
                from: self.phase.as_str(),
                to: AssemblyPhase::Staged.as_str(),
            });
        }

        let tag = &request.tag;
        let lib_directory = self.settings.lib_directory.clone();

        let library = LibraryDirectory::open(&lib_directory)?;
        let removed = library.clean(&self.settings.artifact)?;

        let staged_path = self.stage(
            &self.settings.repository,
            tag,
            &self.settings.staging_directory,
        )?;
        self.phase.advance(AssemblyPhase::Staged)?;

        let subproject = staged_path.join(&self.settings.subproject);
        let options = build_options(&self.settings.build, request.client_mode);
        self.build(&subproject, &options)?;
        self.phase.advance(AssemblyPhase::Built)?;

        let artifacts = self.harvest(
            &subproject.join(BUILD_OUTPUT_DIR),
            &self.settings.artifact,
            &lib_directory,
        )?;
        if artifacts.is_empty() {
            tracing::warn!(
                "No {}*{} artifacts found in {}",
                self.settings.artifact.prefix,
                self.settings.artifact.suffix,
                subproject.join(BUILD_OUTPUT_DIR).display()
            );
        }
        self.phase.advance(AssemblyPhase::Harvested)?;

        let marker = self.mark(&lib_directory, tag, request.client_mode)?;
        self.phase.advance(AssemblyPhase::Marked)?;

        Ok(AssemblyReport {
            tag: tag.clone(),
            client_mode: request.client_mode,
            staged_path,
            removed,
            artifacts,
            marker,
        })
    }
}

/// Only OS X and Linux are supported
pub fn ensure_supported_platform() -> Result<()> {
    match std::env::consts::OS {
        "linux" | "macos" => Ok(()),
        other => Err(AppError::UnsupportedPlatform(other.to_string())),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::AssemblyConfig;
    use crate::error::{BuildError, GitError, ToolError};
    use crate::test_support::{process_lock, FakeTools};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        project: Project,
        tools: FakeTools,
    }

    fn fixture(git_exit: i32, mvn_exit: i32) -> Fixture {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let tools = FakeTools::new(&bin, git_exit, mvn_exit);

        let mut config = AssemblyConfig::default();
        config.tools.git = tools.git.to_string_lossy().into_owned();
        config.tools.mvn = tools.mvn.to_string_lossy().into_owned();
        let project = Project::new(temp.path().to_path_buf(), config);
        fs::create_dir(&project.staging_directory).unwrap();
        fs::create_dir(&project.lib_directory).unwrap();

        Fixture {
            _temp: temp,
            project,
            tools,
        }
    }

    fn orchestrator(fx: &Fixture) -> StagingOrchestrator {
        let settings = OrchestratorSettings::from_project(&fx.project);
        StagingOrchestrator::new(settings, &ToolLocator::new()).unwrap()
    }

    fn request(tag: &str, client_mode: bool) -> AssemblyRequest {
        AssemblyRequest {
            tag: Tag::parse(tag).unwrap(),
            client_mode,
        }
    }

    #[test]
    fn test_full_run_without_client_mode() {
        let _guard = process_lock();
        let fx = fixture(0, 0);
        let lib = &fx.project.lib_directory;
        fs::write(lib.join("parquet-tools-1.7.0.jar"), "old").unwrap();
        fs::write(lib.join("parquet-tools-dist-apache-parquet-1.7.0.tag"), "").unwrap();

        let mut orch = orchestrator(&fx);
        assert_eq!(orch.phase(), AssemblyPhase::ToolsResolved);
        let report = orch.run(&request("apache-parquet-1.8.1", false)).unwrap();

        assert_eq!(orch.phase(), AssemblyPhase::Marked);
        assert!(report.staged_path.is_dir());
        assert_eq!(
            report.staged_path,
            fx.project.staging_directory.join("apache-parquet-1.8.1")
        );
        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.artifacts.names(), vec!["parquet-tools-1.8.1.jar"]);
        assert_eq!(fs::read_to_string(lib.join("parquet-tools-1.8.1.jar")).unwrap(), "jar\n");
        assert!(!lib.join("parquet-tools-1.7.0.jar").exists());
        assert!(!lib.join("original-parquet-tools-1.8.1.jar").exists());

        let marker = lib.join("parquet-tools-dist-apache-parquet-1.8.1.tag");
        assert_eq!(report.marker, marker);
        assert_eq!(fs::metadata(&marker).unwrap().len(), 0);

        let subproject = report.staged_path.join("parquet-tools");
        assert_eq!(
            FakeTools::calls(&fx.tools.mvn_log),
            vec![format!("-f {} clean package -DskipTests", subproject.display())]
        );
    }

    #[test]
    fn test_full_run_with_client_mode() {
        let _guard = process_lock();
        let fx = fixture(0, 0);

        let report = orchestrator(&fx)
            .run(&request("apache-parquet-1.8.1", true))
            .unwrap();

        assert_eq!(
            report.marker.file_name().unwrap(),
            "parquet-tools-dist-apache-parquet-1.8.1-dh.tag"
        );
        let calls = FakeTools::calls(&fx.tools.mvn_log);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("clean package -DskipTests -Plocal"));
    }

    #[test]
    fn test_rerun_skips_clone_but_rebuilds() {
        let _guard = process_lock();
        let fx = fixture(0, 0);

        orchestrator(&fx).run(&request("apache-parquet-1.8.1", false)).unwrap();
        orchestrator(&fx).run(&request("apache-parquet-1.8.1", true)).unwrap();

        assert_eq!(FakeTools::calls(&fx.tools.git_log).len(), 1);
        assert_eq!(FakeTools::calls(&fx.tools.mvn_log).len(), 2);

        // the second run cleared the first run's marker
        let library = LibraryDirectory::open(&fx.project.lib_directory).unwrap();
        let markers = library
            .markers(&MarkerNaming::new("parquet-tools", "-dh"))
            .unwrap();
        assert_eq!(markers.len(), 1);
        assert!(markers[0].client_mode);
    }

    #[test]
    fn test_clone_failure_leaves_no_marker() {
        let _guard = process_lock();
        let fx = fixture(128, 0);

        let mut orch = orchestrator(&fx);
        let err = orch.run(&request("apache-parquet-9.9.9", false)).unwrap_err();

        assert!(matches!(err, AppError::Git(GitError::CloneFailed { .. })));
        assert_eq!(orch.phase(), AssemblyPhase::Failed);
        assert!(FakeTools::calls(&fx.tools.mvn_log).is_empty());
        let library = LibraryDirectory::open(&fx.project.lib_directory).unwrap();
        assert!(library
            .markers(&MarkerNaming::new("parquet-tools", "-dh"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_build_failure_stops_before_harvest() {
        let _guard = process_lock();
        let fx = fixture(0, 1);

        let mut orch = orchestrator(&fx);
        let err = orch.run(&request("apache-parquet-1.8.1", false)).unwrap_err();

        assert!(matches!(err, AppError::Build(BuildError::Failed { .. })));
        assert_eq!(err.stderr_tail(), ["[ERROR] BUILD FAILURE".to_string()]);
        assert_eq!(orch.phase(), AssemblyPhase::Failed);
        // staged tree survives for the next attempt
        assert!(fx.project.staging_directory.join("apache-parquet-1.8.1").is_dir());
        assert!(fs::read_dir(&fx.project.lib_directory).unwrap().next().is_none());
    }

    #[test]
    fn test_missing_tool_fails_before_any_mutation() {
        let _guard = process_lock();
        let fx = fixture(0, 0);
        let lib = &fx.project.lib_directory;
        fs::write(lib.join("parquet-tools-1.7.0.jar"), "old").unwrap();

        let mut settings = OrchestratorSettings::from_project(&fx.project);
        settings.build_tool = "parquet-assembly-missing-mvn".to_string();
        let err = StagingOrchestrator::new(settings, &ToolLocator::new())
            .err()
            .unwrap();

        assert!(matches!(err, AppError::Tool(ToolError::NotFound(_))));
        assert!(lib.join("parquet-tools-1.7.0.jar").exists());
        assert!(fs::read_dir(&fx.project.staging_directory).unwrap().next().is_none());
    }

    #[test]
    fn test_run_is_single_shot() {
        let _guard = process_lock();
        let fx = fixture(0, 0);

        let mut orch = orchestrator(&fx);
        orch.run(&request("apache-parquet-1.8.1", false)).unwrap();
        let err = orch.run(&request("apache-parquet-1.8.1", false)).unwrap_err();

        assert!(matches!(err, AppError::PhaseTransition { .. }));
        assert_eq!(orch.phase(), AssemblyPhase::Marked);
    }

    #[test]
    fn test_missing_lib_directory() {
        let _guard = process_lock();
        let fx = fixture(0, 0);
        fs::remove_dir(&fx.project.lib_directory).unwrap();

        let err = orchestrator(&fx)
            .run(&request("apache-parquet-1.8.1", false))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Library(crate::error::LibraryError::InvalidDirectory(_))
        ));
        assert!(FakeTools::calls(&fx.tools.git_log).is_empty());
    }
}
