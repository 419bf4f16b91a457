use super::find_page_files;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use ditto_codegen::{generate_page_code, Framework, GenerationOptions};
use ditto_schema::PageDocument;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Page document or directory (defaults to the configured source directory)
    pub path: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

#[derive(Debug, Default, PartialEq)]
struct FileReport {
    errors: usize,
    warnings: usize,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };

    println!("🔍 {} Ditto page check", "Starting".green().bold());
    println!("   Input: {}", input.display());
    println!();

    let files = find_page_files(&input)?;
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let report = check_file(file, config.framework);
        total_errors += report.errors;
        total_warnings += report.warnings;
    }

    println!();
    println!(
        "✨ {} Check complete!",
        if total_errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", files.len());
    if total_errors > 0 {
        println!("   {} {}", "Errors:".red(), total_errors);
    }
    if total_warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), total_warnings);
    }

    if total_errors > 0 {
        Err(anyhow::anyhow!("{} structural errors found", total_errors))
    } else if args.deny_warnings && total_warnings > 0 {
        Err(anyhow::anyhow!("{} warnings found", total_warnings))
    } else {
        Ok(())
    }
}

fn check_file(path: &Path, framework: Framework) -> FileReport {
    let doc = match PageDocument::load(path) {
        Ok(doc) => doc,
        Err(e) => {
            println!("{} {}", "✗".red(), path.display());
            println!("    {} {}", "error:".red().bold(), e);
            return FileReport { errors: 1, warnings: 0 };
        }
    };

    let options = GenerationOptions::default().with_framework(framework);
    let result = generate_page_code(&doc, &options);
    let report = FileReport {
        errors: result.errors.len(),
        warnings: result.warnings.len(),
    };

    if report == FileReport::default() {
        println!("{} {}", "✓".green(), path.display());
        return report;
    }

    let marker = if report.errors > 0 { "✗".red() } else { "!".yellow() };
    println!("{} {}", marker, path.display());
    for error in &result.errors {
        println!("    {} {}", "error:".red().bold(), error);
    }
    for warning in &result.warnings {
        println!("    {} {}", "warning:".yellow(), warning);
    }
    report
}
