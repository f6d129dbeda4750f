//! lute: inspect module trees and operator bounds
//!
//! Usage:
//!   lute tree [OPTIONS]
//!   lute sigmoid-bound [OPTIONS]
//!
//! Examples:
//!   lute tree --hidden 4 --input 0.5,-1.0
//!   lute tree --eval
//!   lute sigmoid-bound --delta 0.01 --threshold 1e-15
//!   RUST_LOG=debug lute tree

use clap::{Parser, Subcommand};
use log::{debug, info};

use lute_nn::{Linear, Module, layers};
use lute_ops::functional::map;
use lute_ops::operators::{relu, sigmoid_monotonic_bound};

/// Lute module tree inspector
#[derive(Parser, Debug)]
#[command(name = "lute")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a two-layer network, print its tree and run one forward pass
    Tree {
        /// Number of inputs
        #[arg(long, default_value_t = 2)]
        inputs: usize,

        /// Width of the hidden layer
        #[arg(long, default_value_t = 3)]
        hidden: usize,

        /// Number of outputs
        #[arg(long, default_value_t = 1)]
        outputs: usize,

        /// Input values, comma separated (defaults to all ones)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        input: Vec<f64>,

        /// Switch the network to evaluation mode before printing
        #[arg(long)]
        eval: bool,
    },

    /// Find where sigmoid stops growing measurably
    SigmoidBound {
        /// Step between compared points
        #[arg(long, default_value_t = 1e-2)]
        delta: f64,

        /// Smallest growth still counted
        #[arg(long, default_value_t = 1e-15)]
        threshold: f64,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match args.command {
        Command::Tree {
            inputs,
            hidden,
            outputs,
            input,
            eval,
        } => {
            let mut network = build_network(inputs, hidden, outputs)?;
            if eval {
                network.eval();
            }

            println!("{}", network);
            println!();
            println!("training: {}", network.is_training());
            println!("parameters ({}):", network.num_parameters());
            for (name, param) in network.named_parameters() {
                println!("  {:<24} {:>10.6}", name, param);
            }

            let x = if input.is_empty() {
                vec![1.0; inputs]
            } else {
                input
            };
            let y = forward(&network, &x)?;
            println!();
            println!("forward({:?}) = {:?}", x, y);
        }
        Command::SigmoidBound { delta, threshold } => {
            let bound = sigmoid_bound(delta, threshold)?;
            println!("Upper bound for monotonicity test: {}", bound);
        }
    }

    Ok(())
}

/// `Network(layer1: Linear, layer2: Linear)`
fn build_network(
    inputs: usize,
    hidden: usize,
    outputs: usize,
) -> Result<Module, lute_nn::ModuleError> {
    let mut network = Module::labelled("Network");
    network.set_child("layer1", Linear::new(inputs, hidden).build()?.into_module())?;
    network.set_child("layer2", Linear::new(hidden, outputs).build()?.into_module())?;
    debug!(
        "built network {}->{}->{} with {} parameter(s)",
        inputs,
        hidden,
        outputs,
        network.num_parameters()
    );
    Ok(network)
}

fn sigmoid_bound(delta: f64, threshold: f64) -> Result<u64, lute_ops::OpsError> {
    info!("searching sigmoid bound (delta={delta}, threshold={threshold})");
    sigmoid_monotonic_bound(delta, threshold)
}

/// Apply the layers in registration order with ReLU between them.
fn forward(network: &Module, input: &[f64]) -> Result<Vec<f64>, lute_nn::ModuleError> {
    let hidden_activation = map(relu);
    let children = network.modules();
    let mut x = input.to_vec();
    for (i, layer) in children.iter().enumerate() {
        x = layers::linear(layer, &x)?;
        if i + 1 < children.len() {
            x = hidden_activation(&x);
        }
    }
    Ok(x)
}
