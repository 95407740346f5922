//! MMU Simulator - Main Entry Point
//!
//! Usage: mmu_sim [OPTIONS] -f <command_file>
//!
//! The command file holds one command per line:
//!   Read <address>   - translate a read of a virtual address
//!   Write <address>  - translate a write, marking the page dirty
//!   DUMP_MMU         - print every TLB row
//!   DUMP_PT          - print every present page table entry
//!
//! Options:
//!   -f <file>            Command file (required)
//!   --page-bits <n>      Offset bits per virtual address (default 11)
//!   --vpn-bits <n>       VPN bits per virtual address (default 5)
//!   --pfn-bits <n>       PFN bits, i.e. log2 of physical frames (default 3)
//!   --tlb-entries <n>    TLB rows (default: one per physical frame)
//!   -q, --quiet          Skip the machine architecture banner
//!   -v, --verbose        Debug logging and a summary at the end
//!   -h, --help           Print help information

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use mmu_sim::{MachineConfig, MmuError, Script, VmManager, WriterSink};

/// Command-line configuration
struct Options {
    script: PathBuf,
    machine: MachineConfig,
    quiet: bool,
    verbose: bool,
}

fn main() {
    let options = match parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    init_logging(options.verbose);

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn print_help(program: &str) {
    eprintln!("MMU Simulator - TLB and page table translation with FIFO replacement");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS] -f <command_file>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -f <file>            Command file (Read <n>, Write <n>, DUMP_MMU, DUMP_PT)");
    eprintln!("  --page-bits <n>      Offset bits per virtual address (default 11)");
    eprintln!("  --vpn-bits <n>       VPN bits per virtual address (default 5)");
    eprintln!("  --pfn-bits <n>       log2 of the number of physical frames (default 3)");
    eprintln!("  --tlb-entries <n>    TLB rows (default: one per physical frame)");
    eprintln!("  -q, --quiet          Skip the machine architecture banner");
    eprintln!("  -v, --verbose        Debug logging and a summary at the end");
    eprintln!("  -h, --help           Print this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} -f commands.txt", program);
    eprintln!("  {} --pfn-bits 2 -v -f commands.txt", program);
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("mmu_sim");

    let mut script = None;
    let mut machine = MachineConfig::default();
    let mut tlb_entries = None;
    let mut quiet = false;
    let mut verbose = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-q" | "--quiet" => quiet = true,
            "-f" => {
                let path = iter.next().ok_or("Missing value for -f")?;
                script = Some(PathBuf::from(path));
            }
            "--page-bits" => machine.page_bits = parse_number(arg, iter.next())?,
            "--vpn-bits" => machine.vpn_bits = parse_number(arg, iter.next())?,
            "--pfn-bits" => machine.pfn_bits = parse_number(arg, iter.next())?,
            "--tlb-entries" => tlb_entries = Some(parse_number(arg, iter.next())?),
            _ => {
                return Err(format!("Unknown option: {}\nUse --help for usage information.", arg));
            }
        }
    }

    let Some(script) = script else {
        print_help(program);
        return Err("\nError: Must specify file name with -f".to_string());
    };

    // Oversized PFN widths are left for MachineConfig::validate to reject
    if machine.pfn_bits < usize::BITS {
        machine.tlb_entries = tlb_entries.unwrap_or_else(|| machine.physical_pages());
    }

    Ok(Options {
        script,
        machine,
        quiet,
        verbose,
    })
}

/// Main logic separated from main() for cleaner error handling
fn run(options: &Options) -> Result<(), MmuError> {
    // Step 1: Build the machine, rejecting bad geometry before touching the script
    let mut vm = VmManager::new(options.machine)?;

    // Step 2: Load commands
    let mut script = Script::from_file(&options.script)?;
    log::info!("{} commands in {}", script.len(), options.script.display());

    // Step 3: Execute, streaming the trace to stdout
    if !options.quiet {
        println!("{}", vm.mmu().config());
    }
    let mut sink = WriterSink::new(io::stdout().lock());
    let outcome = vm.run(&mut script, &mut sink);
    sink.finish()?;
    outcome?;

    if options.verbose {
        let stats = vm.mmu().stats();
        eprintln!();
        eprintln!("=== Summary ===");
        eprintln!("Reads:        {}", stats.reads);
        eprintln!("Writes:       {}", stats.writes);
        eprintln!("TLB hits:     {}", stats.tlb_hits);
        eprintln!("Table hits:   {}", stats.table_hits);
        eprintln!("Page faults:  {}", stats.faults);
        eprintln!("Evictions:    {}", stats.evictions);
        eprintln!("Write backs:  {}", stats.write_backs);
    }

    Ok(())
}
