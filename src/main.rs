use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, EnvFilter};
use vc_branch::{parse_input, Graph, Settings};

/// Exact minimum vertex cover of an undirected graph.
///
/// Reads `N M` followed by one `u v` edge per line (1-indexed) and prints the
/// vertices of a minimum cover, one per line.
#[derive(Parser)]
#[command(name = "vc", version, about)]
struct Cli {
    /// Graph file; standard input when omitted
    input: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv); -vvv traces every search node
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print the cover in ascending vertex order
    #[arg(long)]
    sorted: bool,

    /// Print the cover size on the first line
    #[arg(long)]
    with_size: bool,

    /// Give up if no cover of at most K vertices exists
    #[arg(long, value_name = "K")]
    max_size: Option<usize>,

    /// Disable the degree-one reduction
    #[arg(long)]
    no_degree_one: bool,

    /// Stack size of the search thread in MiB
    #[arg(long, default_value_t = 256, value_name = "MIB")]
    stack_mib: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let graph = match &cli.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
            parse_input(BufReader::new(file))
        }
        None => parse_input(io::stdin().lock()),
    }
    .context("invalid graph")?;
    tracing::info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "read graph"
    );

    let settings = Settings {
        degree_one_rule: !cli.no_degree_one,
        max_cover_size: cli.max_size,
        ..Settings::default()
    };
    let Some(solution) = solve_on_large_stack(graph, settings, cli.stack_mib)? else {
        bail!(
            "no vertex cover with at most {} vertices",
            cli.max_size.unwrap_or_default()
        );
    };
    tracing::info!(
        size = solution.cover.len(),
        rounds = solution.stats.rounds,
        nodes = solution.stats.nodes,
        "found minimum cover"
    );

    let mut cover = solution.cover;
    if cli.sorted {
        cover.sort();
    }
    let mut out = BufWriter::new(io::stdout().lock());
    if cli.with_size {
        writeln!(out, "{}", cover.len())?;
    }
    out.write_all(cover.format().as_bytes())?;
    out.flush()?;
    Ok(())
}

/// The recursion goes up to k frames deep, so it gets its own thread.
fn solve_on_large_stack(
    mut graph: Graph,
    settings: Settings,
    stack_mib: usize,
) -> anyhow::Result<Option<vc_branch::Solution>> {
    let handle = std::thread::Builder::new()
        .name("search".into())
        .stack_size(stack_bytes(stack_mib)?)
        .spawn(move || graph.solve(&settings))
        .context("unable to spawn search thread")?;
    match handle.join() {
        Ok(solution) => Ok(solution),
        Err(_) => bail!("search thread panicked"),
    }
}

fn stack_bytes(stack_mib: usize) -> anyhow::Result<usize> {
    let Some(bytes) = stack_mib.max(1).checked_mul(1 << 20) else {
        bail!("--stack-mib {stack_mib} is too large");
    };
    Ok(bytes)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stack_bytes() {
        assert_eq!(stack_bytes(0).unwrap(), 1 << 20);
        assert_eq!(stack_bytes(256).unwrap(), 256 << 20);
        assert!(stack_bytes(usize::MAX).is_err());
        assert!(stack_bytes((usize::MAX >> 20) + 1).is_err());
        assert_eq!(stack_bytes(usize::MAX >> 20).unwrap(), (usize::MAX >> 20) << 20);
    }
}
