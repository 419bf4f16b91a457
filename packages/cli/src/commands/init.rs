use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const EXAMPLE_PAGE: &str = r#"{
  "id": "example",
  "name": "example",
  "child": { "current": "root", "isText": false },
  "componentIndexes": {
    "root": {
      "id": "root",
      "name": "div",
      "feature": "root",
      "children": [{ "current": "button", "isText": false }]
    },
    "button": {
      "id": "button",
      "name": "Button",
      "packageName": "antd",
      "children": [{ "current": "Click me", "isText": true }]
    }
  },
  "props": {
    "button": {
      "type": { "value": "primary" }
    }
  }
}
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Ditto project...".bright_blue().bold());

    let src_dir = PathBuf::from(cwd).join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let example_file = src_dir.join("example.ditto");
    if !example_file.exists() {
        fs::write(&example_file, EXAMPLE_PAGE)?;
        println!("  {} Created example.ditto", "✓".green());
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/example.ditto", args.src_dir);
    println!("  2. Run: ditto generate");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditto_schema::PageDocument;

    #[test]
    fn test_example_page_is_valid() {
        let doc = PageDocument::from_json(EXAMPLE_PAGE).unwrap();
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_init_writes_config_and_example() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let args = InitArgs {
            src_dir: "pages".to_string(),
            out_dir: "web".to_string(),
            force: false,
        };
        init(args, &cwd).unwrap();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.src_dir, "pages");
        assert_eq!(config.out_dir, "web");
        assert!(dir.path().join("pages/example.ditto").exists());
    }
}
