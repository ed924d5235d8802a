use anyhow::Result;
use clap::Parser;
use rayon::prelude::*;

mod cluster;
mod config;
mod data;
mod error;
mod graph;
mod storage;
mod viz;

use cluster::{GirvanNewman, LabelPropagation, NodeColours, Partitioner};
use config::Config;
use graph::CommunityGraph;

#[derive(Parser, Debug)]
#[clap(
    name = "sequence-community-partitioner",
    about = "Subcommunity partitioning of sequence cluster connectivity graphs"
)]
struct Cli {
    /// Path to input edge-list file
    #[clap(long)]
    graph: String,

    /// Path to a tab-separated pairwise distance table
    #[clap(long)]
    distances: Option<String>,

    /// Output directory for results
    #[clap(long, default_value = "partition_results")]
    output_dir: String,

    /// Subcommunities of this size or smaller are merged into larger neighbors
    #[clap(long, default_value = "4")]
    size_threshold: usize,

    /// Remove edges whose pairwise distance exceeds this threshold
    #[clap(long, default_value = "0.5")]
    distance_threshold: f64,

    /// Apply the distance filter before partitioning
    #[clap(long)]
    filter: bool,

    /// Use the hierarchical modularity search instead of label propagation
    #[clap(long)]
    hierarchical: bool,

    /// Hub connectivity threshold used by the upstream pre-processing
    #[clap(long, default_value = "50")]
    hub_threshold: usize,

    /// Edge density parameter used by the upstream pre-processing
    #[clap(long, default_value = "0.2")]
    edge_density: f64,

    /// Skip visualization data
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

/// Partition one community with the configured detection strategy
fn split_community(community: &CommunityGraph, config: &Config) -> Result<Vec<CommunityGraph>> {
    if config.hierarchical {
        Partitioner::new(GirvanNewman::new()).split(community, config.size_threshold)
    } else {
        Partitioner::new(LabelPropagation::new()).split(community, config.size_threshold)
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting subcommunity partitioning");
    log::info!("Input: {}", args.graph);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    let config = Config::new(
        args.size_threshold,
        args.distance_threshold,
        args.hierarchical,
        args.hub_threshold,
        args.edge_density,
    );

    // 1. Load the pre-processed connectivity graph
    let mut graph = data::edgelist::load_edge_list(
        &args.graph,
        config.hub_connectivity_threshold,
        config.edge_density,
    )?;

    // 2. Annotate and optionally filter edges by pairwise distance
    if let Some(distances_path) = &args.distances {
        let distances = data::distances::load_distance_table(distances_path)?;
        graph.annotate_distances(&distances);

        if args.filter {
            let removed = graph.filter_by_distance(&distances, config.distance_threshold)?;
            log::info!(
                "Removed {} edges above distance threshold {}",
                removed,
                config.distance_threshold
            );
        }
    }

    // 3. Split the graph into independent communities
    let communities = data::preprocessing::split_into_communities(&graph);

    // 4. Partition each community into subcommunities; communities are
    // independent graphs, so they can be processed in parallel while the
    // per-graph partitioning stays single-threaded
    let per_community: Vec<Vec<CommunityGraph>> = communities
        .par_iter()
        .map(|community| split_community(community, &config))
        .collect::<Result<Vec<_>>>()?;
    let subcommunities: Vec<CommunityGraph> = per_community.into_iter().flatten().collect();

    log::info!("Found {} subcommunities", subcommunities.len());

    // 5. Record node colours for downstream recolouring
    let colours = NodeColours::from_subcommunities(&subcommunities);

    // 6. Save results
    storage::save_results(&subcommunities, &args.output_dir)?;

    // 7. Generate visualization data if requested
    if !args.skip_viz {
        viz::generate_visualizations(&subcommunities, &colours, &args.output_dir)?;
    }

    log::info!("Partitioning complete. Results saved to {}", args.output_dir);

    Ok(())
}
