// Wed Jan 15 2026 - Alex

use super::args::{Args, Command, DumpAsyncArgs, DumpHeapArgs, DumpLogArgs};
use crate::commands::{
    dumpasync, dumplog, threads, verifyheap, CommandError, DumpAsyncOptions, DumpHeap,
    DumpHeapOptions, OutputFormat,
};
use crate::config::Config;
use crate::continuation::AsyncFilter;
use crate::engine::CancellationToken;
use crate::memory::Address;
use crate::snapshot::Snapshot;
use crate::ui::spinner::ProgressSpinner;
use crate::utils::LoggingUtils;
use anyhow::Context;
use colored::Colorize;
use log::{debug, warn};
use std::io::{self, BufWriter, Write};

pub struct CommandHandler {
    cancellation: CancellationToken,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            cancellation: CancellationToken::new(),
        }
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging(&args);
        let config = self.load_config(&args)?;
        self.setup_thread_pool(&config);
        self.install_interrupt_handler();

        let snapshot = match Snapshot::open(
            &args.snapshot,
            config.snapshot_options(),
            self.cancellation.clone(),
        ) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_latching() => {
                println!("Error: {}", e);
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open snapshot {}", args.snapshot.display()))
            }
        };

        let format = OutputFormat::from_json_flag(args.json);
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let spinner = ProgressSpinner::for_config(config.show_progress, "Walking heaps...");

        let result = match args.command {
            Command::DumpHeap(cmd) => self.handle_dumpheap(&snapshot, &config, cmd, &mut out, format),
            Command::VerifyHeap => {
                verifyheap::run(snapshot.session(), config.parallel_heaps, &mut out, format).map(|_| ())
            }
            Command::DumpAsync(cmd) => self.handle_dumpasync(&snapshot, &config, cmd, &mut out, format),
            Command::DumpLog(cmd) => self.handle_dumplog(&snapshot, cmd, &mut out),
            Command::Threads => threads::run(snapshot.threads(), &mut out, format),
        };
        spinner.finish_and_clear();
        debug!("Command finished after {:?}", spinner.elapsed());

        match result {
            Ok(()) => {
                out.flush()?;
                Ok(())
            }
            Err(e) if e.is_cancelled() => {
                out.flush()?;
                eprintln!("{}", "Interrupted.".yellow());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = LoggingUtils::level_from_str(&args.log_level);
        LoggingUtils::init_logger(level, !args.no_color);
        if args.no_color {
            colored::control::set_override(false);
        }
    }

    fn load_config(&self, args: &Args) -> anyhow::Result<Config> {
        let mut config = match &args.config {
            Some(path) => Config::load(path).map_err(anyhow::Error::msg)?,
            None => Config::default(),
        };
        if let Some(threads) = args.threads {
            config.threads = threads;
        }
        if args.sequential {
            config.parallel_heaps = false;
        }
        if args.progress {
            config.show_progress = true;
        }
        config.validate().map_err(anyhow::Error::msg)?;
        debug!("Effective config: {:?}", config);
        Ok(config)
    }

    fn setup_thread_pool(&self, config: &Config) {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
        {
            debug!("Global thread pool already configured: {}", e);
        }
    }

    fn install_interrupt_handler(&self) {
        let token = self.cancellation.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            warn!("Cannot install Ctrl-C handler: {}", e);
        }
    }

    fn handle_dumpheap<W: Write>(
        &self,
        snapshot: &Snapshot,
        config: &Config,
        args: DumpHeapArgs,
        out: &mut W,
        format: OutputFormat,
    ) -> Result<(), CommandError> {
        let options = DumpHeapOptions {
            type_name: args.type_name,
            short: args.short,
            stat: args.stat,
            sort: args.sort,
        };
        DumpHeap::new(snapshot.session(), options)
            .with_parallel(config.parallel_heaps)
            .run(out, format)
    }

    fn handle_dumpasync<W: Write>(
        &self,
        snapshot: &Snapshot,
        config: &Config,
        args: DumpAsyncArgs,
        out: &mut W,
        format: OutputFormat,
    ) -> Result<(), CommandError> {
        let mut filter = AsyncFilter::default()
            .with_tasks(args.tasks)
            .with_user_defined(args.user_defined)
            .with_completed(args.completed);
        filter.min_object_size = config.min_async_object_size;
        if let Some(type_name) = &args.type_name {
            filter = filter.with_type(type_name);
        }
        if let Some(address) = args.address {
            filter = filter.with_address(Address::new(address));
        }
        let options = DumpAsyncOptions {
            filter,
            stacks: args.stacks,
        };
        dumpasync::run(snapshot.session(), options, out, format).map(|_| ())
    }

    fn handle_dumplog<W: Write>(
        &self,
        snapshot: &Snapshot,
        args: DumpLogArgs,
        out: &mut W,
    ) -> Result<(), CommandError> {
        dumplog::run(snapshot.threads(), &args.file, out).map(|_| ())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
