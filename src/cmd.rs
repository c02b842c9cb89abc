//! Command line interface

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use kdam::{tqdm, BarExt};
use kohctpyktop::layout::generators::{level_template, testcases, LEVEL_COLUMNS, LEVEL_ROWS};
use kohctpyktop::layout::Layer;
use kohctpyktop::sim::{Simulator, DEFAULT_STEPS};
use kohctpyktop::topology::{build_topology, stats::stats, GateId, Topology};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity; repeat for more details
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show the netlist extracted from a layout
    ///
    /// Will print statistics on the nodes and gates, then the pins and the node they drive.
    #[clap()]
    Show(ShowArgs),

    /// Simulate a layout
    ///
    /// Input pins are driven by their waveform, and output pins are compared to their expected
    /// waveform. The command fails if any output differs.
    #[clap(alias = "sim")]
    Simulate(SimulateArgs),
}

/// Layouts available from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutChoice {
    /// Empty level, with power and data pins
    Level,
    /// Single N-type transistor
    Npn,
    /// Single P-type transistor
    Pnp,
    /// Two N-type transistors in a chain
    And,
    /// N-type transistor with two inputs
    Or,
    /// Two P-type transistors in a chain
    Nand,
    /// P-type transistor with two inputs
    Nor,
}

impl LayoutChoice {
    /// Build the layout
    pub fn build(self) -> Layer {
        match self {
            LayoutChoice::Level => level_template(LEVEL_ROWS, LEVEL_COLUMNS),
            LayoutChoice::Npn => testcases::npn_switch(),
            LayoutChoice::Pnp => testcases::pnp_switch(),
            LayoutChoice::And => testcases::and2(),
            LayoutChoice::Or => testcases::or2(),
            LayoutChoice::Nand => testcases::nand2(),
            LayoutChoice::Nor => testcases::nor2(),
        }
    }
}

fn extract(layout: LayoutChoice) -> anyhow::Result<(Layer, Topology)> {
    let layer = layout.build();
    let topology = build_topology(&layer)
        .with_context(|| format!("Could not extract the netlist of layout {:?}", layout))?;
    Ok((layer, topology))
}

/// Command arguments for netlist informations
#[derive(Args)]
pub struct ShowArgs {
    /// Layout to show
    #[arg(short, long, value_enum, default_value_t = LayoutChoice::Level)]
    layout: LayoutChoice,
}

impl ShowArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let (layer, topology) = extract(self.layout)?;
        println!("Layout: {} rows, {} columns", layer.nb_rows(), layer.nb_cols());
        println!("Netlist stats:\n{}", stats(&topology));
        println!("Pins:");
        for pin in layer.pins() {
            let node = match topology.pin_node(pin) {
                Some(n) => n.to_string(),
                None => "-".to_string(),
            };
            let kind = if pin.is_output { "output" } else { "input" };
            println!("  {} ({}) at {}: {}", pin.name, kind, pin.position, node);
        }
        if topology.nb_gates() != 0 {
            println!("Gates:");
        }
        for (i, gate) in topology.gates().iter().enumerate() {
            let [a, b] = gate.power_nodes();
            let groups: Vec<String> = gate
                .inputs()
                .iter()
                .map(|g| {
                    let names: Vec<String> = g.iter().map(|n| n.to_string()).collect();
                    format!("({})", names.join(" | "))
                })
                .collect();
            println!(
                "  {} {} {} <-> {} when {}{}",
                GateId::new(i),
                if gate.is_inversion_gate() { "P" } else { "N" },
                a,
                b,
                if gate.is_inversion_gate() { "!" } else { "" },
                groups.join(" & ")
            );
        }
        Ok(())
    }
}

/// Command arguments for simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Layout to simulate
    #[arg(short, long, value_enum, default_value_t = LayoutChoice::Level)]
    layout: LayoutChoice,

    /// Number of simulation steps
    #[arg(short = 'n', long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Print the waveform of every pin
    #[arg(short, long)]
    waves: bool,
}

impl SimulateArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let (layer, topology) = extract(self.layout)?;
        let mut sim = Simulator::new(&topology, layer.pins())?;
        let mut progress = tqdm!(total = self.steps);
        progress.set_description("Steps simulated");
        for _ in 0..self.steps {
            sim.step();
            progress.update(1)?;
        }
        eprintln!();
        let result = sim.result();
        if self.waves {
            println!("{}", result);
        }
        let mismatches = result.mismatches();
        for m in &mismatches {
            println!(
                "Pin {} at step {}: expected {}",
                result.pin_traces()[m.pin].name,
                m.step,
                m.expected as u8
            );
        }
        if !mismatches.is_empty() {
            bail!(
                "{} mismatches on the outputs over {} steps",
                mismatches.len(),
                self.steps
            );
        }
        println!("All outputs as expected over {} steps", self.steps);
        Ok(())
    }
}
