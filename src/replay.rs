// file: src/replay.rs
// version: 1.0.0
// guid: 37ca3e52-7d71-448f-bd2e-e041cca694f6

//! One full replay of a dump: stage, resolve, acquire, assemble, run

use crate::compiler::{self, CompilePlan, Jdk, JvmOptions};
use crate::config::resolve::ResolutionInputs;
use crate::config::{sanitizer, BuildProperties, ResolvedInvocation, ShrinkerToggles, ToolConfig};
use crate::distribution::{self, Distribution, VersionToken};
use crate::dump::{read_dump, Dump};
use crate::error::CompileDumpError;
use crate::network::NetworkDownloader;
use crate::retrace;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command line choices for a replay
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub dump: Option<PathBuf>,
    pub compiler: Option<String>,
    pub toggles: ShrinkerToggles,
    pub version: Option<String>,
    pub r8_jar: Option<PathBuf>,
    pub override_extraction: bool,
    pub nolib: bool,
    pub jvm: JvmOptions,
    pub classfile: bool,
    pub threads: Option<String>,
    pub min_api: Option<String>,
    pub desugared_lib: Option<PathBuf>,
    pub disable_desugared_lib: bool,
    pub enable_missing_library_api_modeling: bool,
    pub android_platform_build: bool,
    /// Tokens forwarded to the compiler unchanged
    pub passthrough: Vec<String>,
}

/// Callback that takes over handling of the dump's configuration file
pub type ConfigFileConsumer = Box<dyn Fn(&Path) -> Result<()> + Send + Sync>;

/// Extension points for programs that drive replays themselves
#[derive(Default)]
pub struct ReplayHooks {
    /// Replaces the dump's program archive
    pub program_jar: Option<PathBuf>,
    /// Extra `-D` flags placed before the dump's recorded properties
    pub properties: Vec<String>,
    /// Replaces configuration sanitization
    pub config_file_consumer: Option<ConfigFileConsumer>,
}

/// How the compiler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    Succeeded,
    CompilerFailed,
}

impl ReplayStatus {
    pub fn exit_code(&self) -> u8 {
        match self {
            ReplayStatus::Succeeded => 0,
            ReplayStatus::CompilerFailed => 1,
        }
    }
}

/// Everything resolved before any process is started
#[derive(Debug)]
pub struct StagedReplay {
    pub dump: Dump,
    pub properties: BuildProperties,
    pub version: Option<VersionToken>,
    pub invocation: ResolvedInvocation,
}

/// Materialize the dump and resolve options. Fails before anything is run
/// when the dump cannot be compiled.
pub fn stage(options: &ReplayOptions, work_dir: &Path) -> Result<StagedReplay> {
    let source = options
        .dump
        .as_deref()
        .ok_or_else(|| CompileDumpError::config("A dump file or directory must be specified"))?;
    let dump = read_dump(source, work_dir, options.override_extraction)?;

    if dump.program_jar().is_none() {
        return Err(CompileDumpError::dump(
            "Cannot compile dump with no program classes",
        ));
    }
    if dump.library_jar().is_none() {
        warn!("Unexpected lack of library classes in dump");
    }
    dump.warn_unsupported_artifacts();

    let properties = match dump.build_properties_file() {
        Some(file) => BuildProperties::load(&file)?,
        None => BuildProperties::default(),
    };

    let version = match &options.version {
        Some(version) => Some(VersionToken::parse(version)),
        None => dump.version()?.as_deref().map(VersionToken::parse),
    };

    let inputs = ResolutionInputs {
        compiler: options.compiler.as_deref(),
        min_api: options.min_api.as_deref(),
        classfile: options.classfile,
        android_platform_build: options.android_platform_build,
        enable_missing_library_api_modeling: options.enable_missing_library_api_modeling,
    };
    let invocation = ResolvedInvocation::resolve(&inputs, &properties, work_dir)?;

    Ok(StagedReplay {
        dump,
        properties,
        version,
        invocation,
    })
}

async fn resolve_distribution(
    options: &ReplayOptions,
    version: Option<&VersionToken>,
    work_dir: &Path,
    tools: &ToolConfig,
    downloader: &NetworkDownloader,
) -> Result<Distribution> {
    let distribution = match (&options.r8_jar, version) {
        (Some(jar), _) => Distribution::Jar(jar.clone()),
        (None, Some(version)) => {
            distribution::acquire_distribution(version, options.nolib, work_dir, tools, downloader)
                .await?
        }
        (None, None) => {
            return Err(CompileDumpError::config(
                "Unable to determine a compiler version: the dump has no version file",
            ))
        }
    };
    distribution.verify()?;
    Ok(distribution)
}

/// Run the pipeline once in `out`, or in a fresh temporary directory
pub async fn replay_dump(
    out: Option<&Path>,
    options: &ReplayOptions,
    tools: &ToolConfig,
    hooks: &ReplayHooks,
) -> Result<ReplayStatus> {
    let scratch;
    let work_dir: PathBuf = match out {
        Some(dir) => {
            tokio::fs::create_dir_all(dir).await?;
            dir.to_path_buf()
        }
        None => {
            scratch = tempfile::Builder::new().prefix("compiledump").tempdir()?;
            scratch.path().to_path_buf()
        }
    };

    let staged = stage(options, &work_dir)?;
    let downloader = NetworkDownloader::new();
    let jdk = Jdk::new(tools.java_home.as_deref());

    let distribution = resolve_distribution(
        options,
        staged.version.as_ref(),
        &work_dir,
        tools,
        &downloader,
    )
    .await?;
    compiler::wrapper::prepare_shims(&jdk.javac()?, &distribution, &work_dir, tools).await?;

    if options.jvm.debug_agent && !options.nolib {
        warn!("Running debugging agent on r8lib is questionable...");
    }

    let variant = staged.invocation.compiler;
    let config_file = staged
        .dump
        .config_file()
        .filter(|_| variant.accepts_config_file());
    if let Some(config) = &config_file {
        match &hooks.config_file_consumer {
            Some(consumer) => consumer(config)?,
            None => {
                sanitizer::sanitize_config_file(config, &options.toggles)?;
            }
        }
    }

    let desugared_library = if options.disable_desugared_lib {
        None
    } else {
        options
            .desugared_lib
            .clone()
            .or_else(|| staged.dump.desugared_library_json())
    };

    let mut system_properties = hooks.properties.clone();
    system_properties.extend(staged.properties.system_properties());

    let program_jar = match &hooks.program_jar {
        Some(jar) => jar.clone(),
        None => staged
            .dump
            .program_jar()
            .ok_or_else(|| CompileDumpError::dump("Cannot compile dump with no program classes"))?,
    };

    let plan = CompilePlan {
        jvm: options.jvm.clone(),
        system_properties,
        classpath: distribution.classpath_with(Some(&work_dir))?,
        invocation: staged.invocation.clone(),
        work_dir: work_dir.clone(),
        program_jar,
        feature_jars: staged.dump.feature_jars(),
        library_jar: staged.dump.library_jar(),
        classpath_jar: staged.dump.classpath_jar(),
        desugared_library,
        config_file,
        main_dex_rules: staged.dump.main_dex_rules(),
        threads: options.threads.clone(),
        passthrough: options.passthrough.clone(),
    };

    let run = compiler::run_captured(&jdk.java()?, &plan.args()).await?;
    if run.success {
        println!("{}", run.output);
        info!("Compilation succeeded, output in {}", staged.invocation.output.display());
        return Ok(ReplayStatus::Succeeded);
    }

    let retraced = match &staged.version {
        Some(version) if retrace::should_retrace(Some(version), options.nolib) => {
            retrace::try_retrace_output(&run.output, version, &work_dir, tools, &jdk, &downloader)
                .await
        }
        _ => false,
    };
    if !retraced {
        println!("{}", run.output);
    }
    Ok(ReplayStatus::CompilerFailed)
}
