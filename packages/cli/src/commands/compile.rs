use crate::config::{Config, TREE_FILE_SUFFIX};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use treejsx_compiler::{compile_module, CompileOptions, ModuleInput};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Tree file or directory of *.tree.json files
    #[arg(default_value = ".")]
    pub path: String,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Config file (defaults to treejsx.config.json in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Element-construction call (overrides config)
    #[arg(long)]
    pub jsx_factory: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(cwd)?,
    };

    let mut options = config.compiler_options.clone();
    if let Some(factory) = &args.jsx_factory {
        options.jsx_factory = factory.clone();
    }
    debug!(?options, "Resolved compiler options");

    let input = PathBuf::from(cwd).join(&args.path);
    if !input.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", input));
    }

    let (src_dir, tree_files) = if input.is_file() {
        let parent = input.parent().map(Path::to_path_buf).unwrap_or_default();
        (parent, vec![input.clone()])
    } else {
        (input.clone(), find_tree_files(&input))
    };

    if tree_files.is_empty() {
        println!("{}", "⚠️  No *.tree.json files found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "🔨 Compiling component trees...".bright_blue().bold());
        println!("Found {} files", tree_files.len());
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for tree_file in &tree_files {
        let relative_path = tree_file.strip_prefix(&src_dir).unwrap_or(tree_file);
        match compile_file(tree_file, &options) {
            Ok(output) if args.stdout => {
                success_count += 1;
                print!("{}", output);
            }
            Ok(output) => {
                let output_file = write_output(&out_dir, relative_path, &output)?;
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    output_file.display()
                );
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

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} files failed to compile", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} files successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        println!(
            "{} Compiled {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} files failed to compile", error_count))
    }
}

fn find_tree_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.ends_with(TREE_FILE_SUFFIX))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn compile_file(file_path: &Path, options: &CompileOptions) -> Result<String> {
    let source = fs::read_to_string(file_path)?;
    let module = ModuleInput::from_json(&source)?;
    Ok(compile_module(&module, options.clone())?)
}

/// `todo/list.tree.json` → `<out_dir>/todo/list.jsx`; a plain `page.json`
/// becomes `page.jsx`
fn output_path(out_dir: &Path, relative_path: &Path) -> PathBuf {
    let file_name = relative_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(TREE_FILE_SUFFIX)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    let parent = relative_path.parent().unwrap_or_else(|| Path::new(""));
    out_dir.join(parent).join(format!("{}.jsx", stem))
}

fn write_output(out_dir: &Path, relative_path: &Path, output: &str) -> Result<PathBuf> {
    let output_file = output_path(out_dir, relative_path);
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;
    Ok(output_file)
}
