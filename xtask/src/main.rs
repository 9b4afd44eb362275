//! Build helpers for lemmatch: man pages and shell completions.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "xtask", about = "lemmatch development tasks")]
struct Xtask {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Generate man pages for lemmatch and its subcommands
    Man {
        /// Output directory
        #[arg(long, default_value = "target/man")]
        out: PathBuf,
    },
    /// Generate shell completion scripts
    Completions {
        /// Output directory
        #[arg(long, default_value = "target/completions")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Xtask::parse().command {
        Task::Man { out } => generate_man(&out),
        Task::Completions { out } => generate_completions(&out),
    }
}

fn generate_man(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let cmd = lemmatch::command();

    write_man_page(out, "lemmatch", cmd.clone())?;
    for sub in cmd.get_subcommands() {
        let name = format!("lemmatch-{}", sub.get_name());
        write_man_page(out, &name, sub.clone().name(name.clone()))?;
    }
    println!("man pages written to {}", out.display());
    Ok(())
}

fn write_man_page(out: &Path, name: &str, cmd: clap::Command) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buf)
        .with_context(|| format!("failed to render man page for {name}"))?;
    let path = out.join(format!("{name}.1"));
    fs::write(&path, buf).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn generate_completions(out: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;
    let mut cmd = lemmatch::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
        clap_complete::generate_to(shell, &mut cmd, "lemmatch", out)
            .with_context(|| format!("failed to generate {shell} completions"))?;
    }
    println!("completions written to {}", out.display());
    Ok(())
}
