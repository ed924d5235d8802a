//! Visualization data generation module
//!
//! Emits data files only; rendering is handled by an external stage.

use crate::cluster::NodeColours;
use crate::graph::CommunityGraph;
use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Generate visualization data for the subcommunities
pub fn generate_visualizations(
    subcommunities: &[CommunityGraph],
    colours: &NodeColours,
    output_dir: &str,
) -> Result<()> {
    log::info!(
        "Generating visualization data for {} subcommunities",
        subcommunities.len()
    );

    let viz_dir = Path::new(output_dir).join("visualizations");
    fs::create_dir_all(&viz_dir)?;

    generate_node_table(subcommunities, colours, &viz_dir)?;
    for subcommunity in subcommunities {
        generate_graphml(subcommunity, colours, &viz_dir)?;
    }

    // the colour table travels with the data so a later run can recolour
    // related graphs to match
    let colours_file = File::create(viz_dir.join("node_colours.json"))?;
    serde_json::to_writer_pretty(colours_file, colours)?;

    log::info!("Visualization data generated successfully");
    Ok(())
}

/// Write a CSV table of nodes with their subcommunity and colour
fn generate_node_table(
    subcommunities: &[CommunityGraph],
    colours: &NodeColours,
    viz_dir: &Path,
) -> Result<()> {
    let path = viz_dir.join("nodes.csv");
    let mut file = File::create(path)?;

    writeln!(file, "node,subcommunity,colour")?;
    for subcommunity in subcommunities {
        for node in subcommunity.node_set() {
            writeln!(
                file,
                "{},{},{}",
                node,
                subcommunity.label(),
                colours.colour(&node)
            )?;
        }
    }

    Ok(())
}

/// Write one GraphML file for a subcommunity
fn generate_graphml(
    subcommunity: &CommunityGraph,
    colours: &NodeColours,
    viz_dir: &Path,
) -> Result<()> {
    let path = viz_dir.join(format!("{}.graphml", subcommunity.label()));
    let mut file = File::create(path)?;

    writeln!(file, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(file, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(file, "  <key id=\"colour\" for=\"node\" attr.name=\"colour\" attr.type=\"int\"/>")?;
    writeln!(file, "  <key id=\"weight\" for=\"edge\" attr.name=\"weight\" attr.type=\"double\"/>")?;
    writeln!(file, "  <key id=\"distance\" for=\"edge\" attr.name=\"distance\" attr.type=\"double\"/>")?;
    writeln!(file, "  <graph id=\"{}\" edgedefault=\"undirected\">", subcommunity.label())?;

    for node in subcommunity.node_set() {
        writeln!(
            file,
            "    <node id=\"{}\">\n      <data key=\"colour\">{}</data>\n    </node>",
            node,
            colours.colour(&node)
        )?;
    }

    let mut edge_id = 0;
    for (u, v, data) in subcommunity.edges() {
        writeln!(
            file,
            "    <edge id=\"e{}\" source=\"{}\" target=\"{}\">",
            edge_id, u, v
        )?;
        writeln!(file, "      <data key=\"weight\">{}</data>", data.weight)?;
        if let Some(distance) = data.distance {
            writeln!(file, "      <data key=\"distance\">{}</data>", distance)?;
        }
        writeln!(file, "    </edge>")?;
        edge_id += 1;
    }

    writeln!(file, "  </graph>")?;
    writeln!(file, "</graphml>")?;

    Ok(())
}
