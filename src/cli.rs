//! Minimal CLI: load graph → materialize → (report | check)
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::graph;
use crate::materialize::{Materializer, Model, Options};
use crate::typeinfo::GraphTypes;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// materialize model classes from an allOf-style composition graph
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// materialize the graph and print the class report
    Resolve(ResolveOut),
    /// materialize the graph and report configuration diagnostics only
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the node holding the graph in each document
    /// (e.g. /definitions)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ResolveOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// materialize only the subgraph reachable from this schema
    #[arg(long)]
    root: Option<String>,

    /// skip validation entry points entirely
    #[arg(long)]
    no_validation: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// materialize only the subgraph reachable from this schema
    #[arg(long)]
    root: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Resolve(target) => {
                let model = materialize_inputs(
                    &target.input_settings,
                    target.root.as_deref(),
                    Options {
                        validation: !target.no_validation,
                    },
                )?;
                eprint!("{}", model.diagnostics().render());

                let report = crate::report::report(&model);
                let report_src =
                    serde_json::to_string_pretty(&report).context("serializing report")?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("creating {}", parent.display()))?;
                        }
                        std::fs::write(out, &report_src)
                            .with_context(|| format!("writing {}", out.display()))?;
                    }
                    None => println!("{report_src}"),
                }
                Ok(())
            }
            Command::Check(target) => {
                let model = materialize_inputs(
                    &target.input_settings,
                    target.root.as_deref(),
                    Options::default(),
                )?;
                eprint!("{}", model.diagnostics().render());
                let errors = model.diagnostics().error_count();
                if errors > 0 {
                    anyhow::bail!("{errors} configuration error(s)");
                }
                Ok(())
            }
        }
    }
}

fn materialize_inputs(
    input_settings: &InputSettings,
    root: Option<&str>,
    options: Options,
) -> anyhow::Result<Model> {
    let graph = graph::load_graphs(
        &input_settings.input,
        input_settings.json_pointer.as_deref(),
    )
    .context("loading schema graph")?;

    let types = GraphTypes::new(&graph);
    let mut materializer = Materializer::new(&graph, &types).with_options(options);
    match root {
        Some(root) => {
            materializer.resolve(root)?;
        }
        None => materializer.resolve_all()?,
    }
    Ok(materializer.finish())
}
