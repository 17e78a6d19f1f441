//! Command line interface

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use stag::atpg::TestGenerator;
use stag::circuit::Circuit;
use stag::fault::str_to_fault;
use stag::sim::{FaultSimulation, Simulation};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Run fault-free circuit simulator
    ///
    /// Applies one or more fault-free input vectors to a net-list and
    /// prints the resulting output vector for each.
    #[clap(alias = "s")]
    Simulate(SimulateArgs),

    /// Run the deductive fault simulator
    ///
    /// Finds every stuck-at fault detected by one or more test vectors
    /// (the `X` value is also accepted in these vectors).
    #[clap(alias = "f")]
    Faults(FaultsArgs),

    /// Generate a test vector that detects a given fault
    ///
    /// Runs PODEM (Path-Oriented Decision Making) to find an input
    /// vector that activates a fault and propagates it to a primary
    /// output, or reports the fault as undetectable.
    #[clap(alias = "g")]
    Generate(GenerateArgs),
}

/// Read the lines of `file`, if given, and append them to `vectors`.
fn extend_from_file(vectors: &mut Vec<String>, file: &Option<PathBuf>) -> Result<(), ExitCode> {
    if let Some(path) = file {
        let contents = fs::read_to_string(path).map_err(|e| {
            eprintln!("error reading {}: {e}", path.display());
            ExitCode::FAILURE
        })?;
        vectors.extend(contents.lines().filter(|l| !l.is_empty()).map(str::to_string));
    }
    Ok(())
}

fn load_circuit(path: &PathBuf) -> Result<Circuit, ExitCode> {
    let contents = fs::read_to_string(path).map_err(|e| {
        eprintln!("error reading {}: {e}", path.display());
        ExitCode::FAILURE
    })?;
    let lines: Vec<&str> = contents.lines().collect();
    Circuit::load(&lines).map_err(|e| {
        eprintln!("error loading circuit: {e}");
        ExitCode::FAILURE
    })
}

/// Command arguments for fault-free simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Net-list file (circuit) to simulate
    net_file: PathBuf,

    /// Path to a file containing additional input vector strings
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// One or more input vectors to simulate
    input_vectors: Vec<String>,
}

impl SimulateArgs {
    pub fn run(&self) -> Result<(), ExitCode> {
        let circuit = load_circuit(&self.net_file)?;
        let mut vectors = self.input_vectors.clone();
        extend_from_file(&mut vectors, &self.file)?;

        let mut sim = Simulation::new(&circuit);
        println!("Circuit: {}", self.net_file.display());
        println!("Inputs | Outputs");
        for vector in &vectors {
            match sim.simulate_input(vector) {
                Ok(out) => println!("{vector} | {out}"),
                Err(e) => eprintln!("{vector} | error: {e}"),
            }
        }
        Ok(())
    }
}

/// Command arguments for deductive fault simulation
#[derive(Args)]
pub struct FaultsArgs {
    /// Net-list file (circuit) to detect faults on
    net_file: PathBuf,

    /// Path to a file containing additional test vector strings
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// One or more test vectors to apply to the circuit
    input_vectors: Vec<String>,
}

impl FaultsArgs {
    pub fn run(&self) -> Result<(), ExitCode> {
        let circuit = load_circuit(&self.net_file)?;
        let mut vectors = self.input_vectors.clone();
        extend_from_file(&mut vectors, &self.file)?;

        let mut sim = FaultSimulation::new(&circuit);
        println!("Circuit: {}", self.net_file.display());
        for vector in &vectors {
            println!("Input vector: {vector}");
            match sim.detect_faults(vector) {
                Ok(faults) => {
                    println!("------ Detected faults ({}) ------", faults.len());
                    for f in &faults {
                        println!("{:>4} stuck at {}", f.net_id.to_string(), f.stuck_at);
                    }
                }
                Err(e) => eprintln!("error: {e}"),
            }
            println!();
        }
        Ok(())
    }
}

/// Command arguments for PODEM test generation
#[derive(Args)]
pub struct GenerateArgs {
    /// Net-list file (circuit) to test
    net_file: PathBuf,

    /// Path to a file containing additional fault strings
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// One or more faults to generate tests for (e.g. 5-sa-0)
    faults: Vec<String>,
}

impl GenerateArgs {
    pub fn run(&self) -> Result<(), ExitCode> {
        let circuit = load_circuit(&self.net_file)?;
        let mut fault_strs = self.faults.clone();
        extend_from_file(&mut fault_strs, &self.file)?;

        let mut parsed = Vec::new();
        for s in &fault_strs {
            match str_to_fault(s) {
                Some(f) => parsed.push(f),
                None => {
                    eprintln!("fault {s:?} is invalid");
                    eprintln!("format: [net-id]-sa-[0|1]. e.g. 2-sa-0, net123-sa-0, etc.");
                    return Err(ExitCode::FAILURE);
                }
            }
        }
        parsed.sort();

        let width = fault_strs.iter().map(String::len).max().unwrap_or(0);
        let mut generator = TestGenerator::new(&circuit);
        println!("Circuit: {}", self.net_file.display());
        println!("{:<width$} | Test", "Fault");
        for fault in &parsed {
            let label = fault.to_string();
            match generator.generate_test(fault) {
                Ok(Some(test)) => println!("{label:<width$} | {test}"),
                Ok(None) => println!("{label:<width$} | UNDETECTABLE"),
                Err(_) => println!("{label:<width$} | NON-EXISTENT"),
            }
        }
        Ok(())
    }
}
