use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Once;

static SECD_TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "secd::vm::exec=debug,secd::vm::loader=debug,secd::vm::heap=info";

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use secd_core::{
    Capacities,
    vm::{self, CodeSegment, Machine, RunStats, Value},
};


#[derive(Debug, Parser)]
#[command(name = "secd", author, version, about = "SECD bytecode machine", long_about = None)]
struct CliArgs {
    /// Subcommands like `asm FILE`
    #[command(subcommand)]
    command: Option<Commands>,

    /// Bytecode to run: whitespace separated integers. Reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    #[command(flatten)]
    caps: CapacityArgs,

    /// Print run statistics to stderr once the program halts
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Default, Args)]
struct CapacityArgs {
    /// TOML file with `code`, `stack`, `dump` and `heap` capacities
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Code segment capacity in words
    #[arg(long, value_name = "N", global = true)]
    code_size: Option<usize>,

    /// Operand stack capacity
    #[arg(long, value_name = "N", global = true)]
    stack_size: Option<usize>,

    /// Dump capacity in frames
    #[arg(long, value_name = "N", global = true)]
    dump_size: Option<usize>,

    /// Heap arena capacity in cells
    #[arg(long, value_name = "N", global = true)]
    heap_size: Option<usize>,
}

impl CapacityArgs {
    /// Config file first, then flag overrides.
    fn resolve(&self) -> anyhow::Result<Capacities> {
        let mut caps = match &self.config {
            Some(path) => Capacities::load(path)?,
            None => Capacities::default(),
        };
        if let Some(n) = self.code_size {
            caps.code = n;
        }
        if let Some(n) = self.stack_size {
            caps.stack = n;
        }
        if let Some(n) = self.dump_size {
            caps.dump = n;
        }
        if let Some(n) = self.heap_size {
            caps.heap = n;
        }
        caps.validate()?;
        Ok(caps)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Assemble mnemonic source into the integer bytecode.
    Asm {
        /// Assembly source; stdin when omitted or `-`
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print an instruction listing of a bytecode file.
    Disasm {
        /// Bytecode file; stdin when omitted or `-`
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var("SECD_TRACE") {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    SECD_TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p.as_os_str() == "-")
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match path {
        Some(p) if !is_stdin(Some(p)) => {
            let file = File::open(p).with_context(|| format!("Failed to open '{}'", p.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn load_code(path: Option<&Path>, caps: &Capacities) -> anyhow::Result<CodeSegment> {
    let mut code = CodeSegment::with_capacity(caps.code)?;
    vm::read_code(open_input(path)?, &mut code)?;
    Ok(code)
}

fn format_stats(stats: &RunStats) -> String {
    format!(
        "steps={} peak_stack={} peak_dump={} heap_cells={}",
        stats.steps, stats.peak_stack, stats.peak_dump, stats.heap_cells
    )
}

fn run_program(path: Option<&Path>, caps: &Capacities, show_stats: bool) -> anyhow::Result<i64> {
    let code = load_code(path, caps)?;
    let mut machine = Machine::new(code, caps)?;
    let outcome = machine.run();
    if show_stats {
        eprintln!("{}", format_stats(&machine.stats()));
    }
    match outcome? {
        Value::Int(n) => Ok(n),
        other @ Value::Closure(_) => bail!("program halted with a {} on top of the stack", other.type_name()),
    }
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs {
        command,
        file,
        caps,
        stats,
    } = CliArgs::parse();
    let caps = caps.resolve()?;

    match command {
        Some(Commands::Asm { file }) => {
            let mut source = String::new();
            open_input(file.as_deref())?
                .read_to_string(&mut source)
                .context("failed to read assembly source")?;
            for word in vm::assemble(&source)? {
                println!("{word}");
            }
        }
        Some(Commands::Disasm { file }) => {
            let code = load_code(file.as_deref(), &caps)?;
            for entry in vm::disassemble(code.words()) {
                println!("{entry}");
            }
        }
        None => {
            let result = run_program(file.as_deref(), &caps, stats)?;
            println!("{result}");
        }
    }
    Ok(())
}
