use super::find_page_files;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use ditto_codegen::{generate_page_code, Framework, GenerationOptions, Warning};
use ditto_schema::PageDocument;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Page document or directory (defaults to the configured source directory)
    pub path: Option<PathBuf>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Emit only the JSX of the root, without imports or hooks
    #[arg(long)]
    pub simple: bool,

    /// Component to generate from instead of the document root
    #[arg(long)]
    pub root: Option<String>,

    /// Name of the exported component (overrides config)
    #[arg(long)]
    pub component_name: Option<String>,

    /// Target framework, react or vue (overrides config)
    #[arg(long)]
    pub framework: Option<Framework>,
}

pub fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(framework) = args.framework {
        if framework != config.framework {
            // a configured extension belongs to the configured framework
            config.extension = None;
        }
        config.framework = framework;
    }
    let src_dir = config.get_src_dir(cwd);
    let input = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => src_dir.clone(),
    };

    if !input.exists() {
        return Err(anyhow!("Source path does not exist: {}", input.display()));
    }

    println!("{}", "🔨 Generating pages...".bright_blue().bold());

    let files = find_page_files(&input)?;
    if files.is_empty() {
        println!("{}", "⚠️  No .ditto files found".yellow());
        return Ok(());
    }
    println!("Found {} files", files.len());

    // Paths inside the source directory keep their layout under the output
    let base = if input.is_dir() {
        input.clone()
    } else if input.starts_with(&src_dir) {
        src_dir.clone()
    } else {
        input.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut success_count = 0;
    let mut error_count = 0;
    let mut warning_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&base).unwrap_or(file);
        match generate_file(file, relative_path, &args, &config, cwd) {
            Ok((output, warnings)) => {
                success_count += 1;
                warning_count += warnings.len();
                println!("  {} {} → {}", "✓".green(), relative_path.display(), output);
                for warning in &warnings {
                    println!("      {} {}", "warning:".yellow(), warning);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Generated {} pages successfully ({} warnings)",
            "✅".green(),
            success_count,
            warning_count
        );
        Ok(())
    } else {
        println!(
            "{} Generated {} pages, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} pages failed to generate", error_count))
    }
}

fn generate_file(
    file_path: &Path,
    relative_path: &Path,
    args: &GenerateArgs,
    config: &Config,
    cwd: &str,
) -> Result<(String, Vec<Warning>)> {
    let doc = PageDocument::load(file_path)?;
    debug!(file = %file_path.display(), page = %doc.name, "Loaded page document");

    let options = GenerationOptions {
        simple: args.simple,
        root: args.root.clone(),
        component_name: args
            .component_name
            .clone()
            .unwrap_or_else(|| config.component_name.clone()),
        framework: config.framework,
    };

    let result = generate_page_code(&doc, &options);
    let code = match result.page_code {
        Some(code) => code,
        None => {
            let messages: Vec<String> = result.errors.iter().map(|e| e.to_string()).collect();
            return Err(anyhow!(messages.join("; ")));
        }
    };

    if args.stdout {
        println!("{}", code);
        return Ok(("stdout".to_string(), result.warnings));
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    let output_file = out_dir.join(relative_path).with_extension(config.extension());

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, code)?;

    Ok((output_file.display().to_string(), result.warnings))
}
