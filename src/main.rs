use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mumtree::matches::{find_matches_chunked, MatchMode};
use mumtree::output::{print_stats, OutputOptions, Printer, Strand};
use mumtree::seq::{read_fasta, FastaRecord, MultiSeq};
use mumtree::stree::{SuffixTree, TreeConfig};
use mumtree::utils::dna::{mask_non_acgt, reverse_complement, QUERY_MASK, REFERENCE_MASK};
use mumtree::utils::progress;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mumtree")]
#[command(about = "Find maximal exact matches between genome sequences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Match query sequences against a reference
    Match(MatchArgs),
    /// Build the tree for a reference and show its statistics
    Stats {
        /// Reference FASTA file
        reference: PathBuf,

        /// Also list the number of branch nodes at each depth
        #[arg(long)]
        depths: bool,

        #[command(flatten)]
        tree: TreeArgs,
    },
}

#[derive(Args)]
struct TreeArgs {
    /// Tree growth settings as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Check the tree invariants after construction
    #[arg(long)]
    verify: bool,
}

#[derive(Args)]
struct MatchArgs {
    /// Reference FASTA file
    reference: PathBuf,

    /// Query FASTA files
    #[arg(required = true)]
    queries: Vec<PathBuf>,

    /// Minimum match length
    #[arg(short = 'l', long, default_value_t = 20)]
    min_length: usize,

    /// Which matches to report
    #[arg(long, value_enum, default_value_t = Mode::MumCandidates)]
    mode: Mode,

    /// Match the forward strand and the reverse complement
    #[arg(short, long, conflicts_with = "reverse")]
    both: bool,

    /// Match the reverse complement only
    #[arg(short, long)]
    reverse: bool,

    /// Report reverse complement positions relative to the forward strand
    #[arg(short = 'c')]
    forward_positions: bool,

    /// Only match the characters a, c, g and t
    #[arg(short, long)]
    nucleotides_only: bool,

    /// Print the reference name even for a single-record reference
    #[arg(short = 'F', long)]
    four_column: bool,

    /// Print sequence lengths in headers
    #[arg(short = 'L', long)]
    show_lengths: bool,

    /// Print the matching string below each match
    #[arg(short, long)]
    show_string: bool,

    /// Number of query chunks processed in parallel (default: all cores)
    #[arg(short = 'j', long)]
    chunks: Option<usize>,

    /// Print one JSON object per match
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(flatten)]
    tree: TreeArgs,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Mode {
    MumCandidates,
    MaxMatches,
}

impl From<Mode> for MatchMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::MumCandidates => MatchMode::MumCandidates,
            Mode::MaxMatches => MatchMode::MaxMatches,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Match(args) => run_match(args)?,
        Commands::Stats {
            reference,
            depths,
            tree,
        } => {
            let records = load_reference(&reference, false)?;
            let multi = MultiSeq::from_records(&records);
            let suffix_tree = build_tree(&multi, &tree)?;
            let distribution = depths.then(|| suffix_tree.depth_distribution());
            print_stats(
                &reference.display().to_string(),
                &multi,
                suffix_tree.stats(),
                distribution.as_deref(),
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<TreeConfig> {
    let Some(path) = path else {
        return Ok(TreeConfig::default());
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
}

fn load_reference(path: &Path, nucleotides_only: bool) -> Result<Vec<FastaRecord>> {
    let mut records = read_fasta(path).with_context(|| format!("loading reference {}", path.display()))?;
    if nucleotides_only {
        for record in &mut records {
            mask_non_acgt(&mut record.seq, REFERENCE_MASK);
        }
    }
    info!(
        records = records.len(),
        symbols = records.iter().map(FastaRecord::len).sum::<usize>(),
        "loaded reference"
    );
    Ok(records)
}

fn build_tree<'t>(multi: &'t MultiSeq, args: &TreeArgs) -> Result<SuffixTree<'t>> {
    let config = load_config(args.config.as_deref())?;
    let tree = SuffixTree::build_with_progress(multi.text(), &config).context("building suffix tree")?;
    if args.verify {
        let spinner = progress::spinner("verifying suffix tree");
        let verified = tree.verify();
        spinner.finish_and_clear();
        verified.context("suffix tree failed verification")?;
        info!("suffix tree verified");
    }
    Ok(tree)
}

fn run_match(args: MatchArgs) -> Result<()> {
    if args.min_length == 0 {
        bail!("minimum match length must be at least 1");
    }

    let records = load_reference(&args.reference, args.nucleotides_only)?;
    let multi = MultiSeq::from_records(&records);
    drop(records);
    let tree = build_tree(&multi, &args.tree)?;

    let mode = MatchMode::from(args.mode);
    let chunks = args.chunks.unwrap_or_else(rayon::current_num_threads).max(1);
    let options = OutputOptions {
        four_column: args.four_column,
        show_lengths: args.show_lengths,
        show_string: args.show_string,
        forward_positions: args.forward_positions,
        json: args.json,
    };
    let mut printer = Printer::stdout(&multi, options, !args.no_color);

    let forward = !args.reverse;
    let reverse = args.reverse || args.both;

    for path in &args.queries {
        let queries = read_fasta(path).with_context(|| format!("loading query {}", path.display()))?;
        for mut query in queries {
            if args.nucleotides_only {
                mask_non_acgt(&mut query.seq, QUERY_MASK);
            }

            if forward {
                let found = find_matches_chunked(&tree, &query.seq, args.min_length, mode, chunks);
                info!(query = %query.name, matches = found.len(), "forward strand");
                let strand = Strand {
                    name: &query.name,
                    len: query.len(),
                    reverse: false,
                };
                printer.print_strand(strand, &found).context("writing matches")?;
            }
            if reverse {
                let rc = reverse_complement(&query.seq);
                let found = find_matches_chunked(&tree, &rc, args.min_length, mode, chunks);
                info!(query = %query.name, matches = found.len(), "reverse strand");
                let strand = Strand {
                    name: &query.name,
                    len: query.len(),
                    reverse: true,
                };
                printer.print_strand(strand, &found).context("writing matches")?;
            }
        }
    }

    Ok(())
}
