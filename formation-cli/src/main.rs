use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use formation_core::error::TemplateError;
use formation_core::sink;
use formation_core::validate::{Finding, Severity};

mod stacks;

#[derive(Parser)]
#[command(name = "formation")]
#[command(about = "Build and render declarative infrastructure templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the built-in stack and print every finding
    Validate {
        /// Print findings as JSON to stdout
        #[arg(long)]
        json: bool,
    },
    /// Render the built-in stack to a template file
    Render {
        /// Output path for the rendered template
        #[arg(long, short, default_value = "lab-template.json")]
        out: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { json } => run_validate(json),
        Commands::Render { out } => run_render(&out),
        Commands::Completions { shell } => run_completions(shell),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(TemplateError::Validation(findings)) = e.downcast_ref::<TemplateError>() {
            for finding in findings {
                print_finding(finding);
            }
        }
        process::exit(1);
    }
}

fn run_validate(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let template = stacks::wordpress::template()?;
    let findings = template.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&findings)?);
    } else if findings.is_empty() {
        println!("{} no findings", "OK".green().bold());
    } else {
        for finding in &findings {
            print_finding(finding);
        }
    }

    let fatal = findings.iter().filter(|f| f.is_fatal()).count();
    if fatal > 0 {
        return Err(format!("{fatal} fatal finding(s)").into());
    }
    Ok(())
}

fn run_render(out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut template = stacks::wordpress::template()?;
    let rendered = template.render()?;

    // Warnings never block a render, but they are never swallowed either.
    for warning in &rendered.warnings {
        print_finding(warning);
    }

    sink::write_document(&rendered.document, out)?;
    println!(
        "{} wrote {} ({} resources, {} parameters)",
        "OK".green().bold(),
        out.display(),
        template.resources().len(),
        template.parameters().len()
    );
    Ok(())
}

fn run_completions(shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    let mut command = Cli::command();
    clap_complete::generate(shell, &mut command, "formation", &mut io::stdout());
    Ok(())
}

fn print_finding(finding: &Finding) {
    let tag = match finding.severity {
        Severity::Warning => "warning:".yellow().bold(),
        Severity::Error => "error:".red().bold(),
    };
    eprintln!("{} {} ({})", tag, finding.message, finding.path);
}
