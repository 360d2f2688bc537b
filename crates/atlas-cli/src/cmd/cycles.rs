//! `atlas cycles`: list import cycles in canonical order.

use std::io::Write;
use std::path::Path;

use atlas_render::impact::render_path;
use clap::Args;
use serde::Serialize;

use super::{InputArgs, analyze};
use crate::output::{OutputMode, render};

/// Arguments for `atlas cycles`.
#[derive(Args, Debug, Clone, Default)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    /// Each cycle starts at its smallest id and omits the closing repeat.
    cycles: Vec<Vec<String>>,
}

/// Execute `atlas cycles`.
pub fn run_cycles(
    args: &CyclesArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let analysis = analyze(&args.input, project_root, false, false)?;
    let payload = CyclesOutput {
        cycles: analysis.graph.cycles,
    };
    render(output, &payload, render_cycles_human)
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No import cycles found.")?;
        return Ok(());
    }

    writeln!(w, "Import cycles ({})", payload.cycles.len())?;
    for cycle in &payload.cycles {
        let Some(start) = cycle.first() else {
            continue;
        };
        let mut closed = cycle.clone();
        closed.push(start.clone());
        writeln!(w, "  {}", render_path(&closed))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human(payload: &CyclesOutput) -> String {
        let mut out = Vec::new();
        render_cycles_human(payload, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn cycles_args_take_a_manifest() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: CyclesArgs,
        }

        let parsed = Wrapper::parse_from(["test", "m.json", "--root", "repo"]);
        assert_eq!(parsed.args.input.manifest, Path::new("m.json"));
        assert_eq!(parsed.args.input.root.as_deref(), Some(Path::new("repo")));
    }

    #[test]
    fn no_cycles_message() {
        let rendered = human(&CyclesOutput { cycles: Vec::new() });
        assert_eq!(rendered, "No import cycles found.\n");
    }

    #[test]
    fn cycles_render_closed() {
        let rendered = human(&CyclesOutput {
            cycles: vec![
                vec!["a.ts".to_string(), "b.ts".to_string()],
                vec!["self.ts".to_string()],
            ],
        });
        assert_eq!(
            rendered,
            "Import cycles (2)\n  a.ts -> b.ts -> a.ts\n  self.ts -> self.ts\n"
        );
    }
}
