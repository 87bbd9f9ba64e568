use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the esup binary.
#[derive(Parser, Debug)]
#[command(
    name = "esup",
    version,
    about = "Turn ES5 code into readable ES6, one selectable transform at a time",
    override_usage = "esup [options] <file>"
)]
pub struct CliArgs {
    /// Write the output to a file instead of stdout.
    #[arg(short = 'o', long = "out-file", value_name = "out")]
    pub out_file: Option<PathBuf>,

    /// Perform only the specified transforms.
    #[arg(short = 't', long, value_name = "a,b,c", value_delimiter = ',')]
    pub transformers: Option<Vec<String>>,

    /// Do not perform the specified transforms.
    #[arg(long = "disable-transformers", value_name = "a,b,c", value_delimiter = ',')]
    pub disable_transformers: Option<Vec<String>>,

    /// Transform CommonJS module syntax.
    #[arg(long, value_name = "commonjs")]
    pub module: Option<String>,

    /// Print the resolved transformer configuration as JSON and exit.
    #[arg(long = "show-config")]
    pub show_config: bool,

    /// Input file. Reads stdin when omitted.
    #[arg(value_name = "file")]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod tests;
