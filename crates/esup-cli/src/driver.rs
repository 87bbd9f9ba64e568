//! Option validation and I/O around `esup_core::transform_source`.

use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use esup_core::{TransformConfig, resolve, transform_source};

use crate::args::CliArgs;

/// Exit status for any failure.
pub const EXIT_FAILURE: i32 = 2;

/// Where the source text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }
}

/// Validated command-line options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub input: Input,
    pub out_file: Option<PathBuf>,
    pub config: TransformConfig,
}

/// Validate `args`: the input file first, then the transformer selection.
pub fn parse_options(args: &CliArgs) -> Result<Options> {
    let input = input_file(&args.files)?;
    let config = transform_config(args)?;
    Ok(Options {
        input,
        out_file: args.out_file.clone(),
        config,
    })
}

fn input_file(files: &[PathBuf]) -> Result<Input> {
    match files {
        [] => Ok(Input::Stdin),
        [file] if file.exists() => Ok(Input::File(file.clone())),
        [file] => bail!("File {} does not exist.", file.display()),
        _ => bail!("Only one input file allowed, but {} given instead.", files.len()),
    }
}

fn transform_config(args: &CliArgs) -> Result<TransformConfig> {
    let config = resolve(
        args.transformers.as_deref(),
        args.disable_transformers.as_deref(),
        args.module.as_deref(),
    )?;
    Ok(config)
}

/// Run one invocation. Output goes to `--out-file` when given, else to
/// `stdout`.
pub fn run(args: &CliArgs, stdin: &mut dyn Read, stdout: &mut dyn Write) -> Result<()> {
    if args.show_config {
        let config = transform_config(args)?;
        let json = serde_json::to_string_pretty(&config).context("failed to serialize config")?;
        writeln!(stdout, "{json}").context("failed to write to stdout")?;
        return Ok(());
    }

    let options = parse_options(args)?;
    let source = read_input(&options.input, stdin)?;
    tracing::debug!(
        input = %options.input.name(),
        len = source.len(),
        enabled = options.config.enabled_count(),
        "transforming"
    );

    let output = transform_source(&source, &options.config)?;

    match &options.out_file {
        Some(path) => write_file(path, &output),
        None => stdout
            .write_all(output.as_bytes())
            .context("failed to write to stdout"),
    }
}

fn read_input(input: &Input, stdin: &mut dyn Read) -> Result<String> {
    match input {
        Input::Stdin => {
            let mut source = String::new();
            stdin
                .read_to_string(&mut source)
                .context("failed to read from stdin")?;
            Ok(source)
        }
        Input::File(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
    }
}

fn write_file(path: &Path, output: &str) -> Result<()> {
    std::fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(())
}
