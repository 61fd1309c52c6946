use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use markdown_format::{Config, Mode};

#[derive(Parser)]
#[command(name = "markdown-format")]
#[command(about = "Print the table of contents or the canonical form of Markdown files")]
struct Cli {
    /// Input Markdown files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print each file in canonical form instead of its table of contents
    #[arg(long)]
    canonical: bool,

    /// Config file (TOML); built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report a failing file and continue with the rest
    #[arg(long)]
    keep_going: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Load config and process every input file. Returns whether all succeeded.
fn run(cli: &Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };
    let keep_going = cli.keep_going || config.run.keep_going;
    let mode = if cli.canonical {
        Mode::Canonical
    } else {
        Mode::Outline
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let all_ok = process_files(
        &mut out,
        &mut io::stderr(),
        &cli.files,
        mode,
        &config,
        keep_going,
    )?;
    out.flush()?;
    Ok(all_ok)
}

/// Write the result for each file to `out`, with a `### <file>` header
/// before each one when there is more than one file.
///
/// With `keep_going`, a failing file is reported to `errors` and the rest
/// are still processed; otherwise the first failure is returned.
fn process_files(
    out: &mut impl Write,
    errors: &mut impl Write,
    files: &[PathBuf],
    mode: Mode,
    config: &Config,
    keep_going: bool,
) -> Result<bool> {
    let with_headers = files.len() > 1;
    let mut all_ok = true;

    for file in files {
        if with_headers {
            writeln!(out, "### {}", file.display())?;
        }
        match markdown_format::process_file(file, mode, config) {
            Ok(text) => out.write_all(text.as_bytes())?,
            Err(e) if keep_going => {
                log::debug!("continuing after failure in {}", file.display());
                writeln!(errors, "Error: {}: {}", file.display(), e)?;
                all_ok = false;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("{}", file.display()));
            }
        }
    }

    Ok(all_ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run_files(
        files: &[PathBuf],
        mode: Mode,
        keep_going: bool,
    ) -> (Result<bool>, String, String) {
        let mut out = Vec::new();
        let mut errors = Vec::new();
        let result = process_files(
            &mut out,
            &mut errors,
            files,
            mode,
            &Config::default(),
            keep_going,
        );
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(errors).unwrap(),
        )
    }

    #[test]
    fn single_file_has_no_header() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "one.md", "# One\n\n## Intro\n");

        let (result, out, errors) = run_files(&[file], Mode::Outline, false);

        assert!(result.unwrap());
        assert_eq!(out, "- [Intro](#intro)\n");
        assert_eq!(errors, "");
    }

    #[test]
    fn several_files_get_headers() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "first.md", "## A\n");
        let second = write(&dir, "second.md", "Text\n\n\n\nMore\n");

        let files = [first.clone(), second.clone()];
        let (result, out, _) = run_files(&files, Mode::Canonical, false);

        assert!(result.unwrap());
        assert_eq!(
            out,
            format!(
                "### {}\n## A\n### {}\nText\n\nMore\n",
                first.display(),
                second.display()
            )
        );
    }

    #[test]
    fn keep_going_reports_and_continues() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "broken.md", "## A\n#### Skip\n");
        let good = write(&dir, "good.md", "## B\n");

        let files = [broken.clone(), good.clone()];
        let (result, out, errors) = run_files(&files, Mode::Outline, true);

        assert!(!result.unwrap());
        assert_eq!(
            out,
            format!(
                "### {}\n### {}\n- [B](#b)\n",
                broken.display(),
                good.display()
            )
        );
        assert!(errors.starts_with(&format!("Error: {}: ", broken.display())));
        assert!(errors.contains("skip"));
    }

    #[test]
    fn first_failure_aborts_by_default() {
        let dir = TempDir::new().unwrap();
        let broken = write(&dir, "broken.md", "## A\n#### Skip\n");
        let good = write(&dir, "good.md", "## B\n");

        let files = [broken.clone(), good];
        let (result, out, errors) = run_files(&files, Mode::Outline, false);

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
        assert_eq!(out, format!("### {}\n", broken.display()));
        assert_eq!(errors, "");
    }

    #[test]
    fn missing_file_fails_with_keep_going_too() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.md");

        let (result, out, errors) = run_files(&[missing], Mode::Canonical, true);

        assert!(!result.unwrap());
        assert_eq!(out, "");
        assert!(errors.contains("missing.md"));
    }
}
