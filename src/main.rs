use clap::Parser;
use env_logger::{Builder, Env};
use snapbrk::cli::{Cli, Command, CreateArgs};
use snapbrk::report;
use snapbrk::{CleanupAlgorithm, Config, CreateOptions, Snapper, SnapshotError, SnapshotType};

/// Exit codes, one per error kind.
mod codes {
    pub const USAGE: i32 = 1;
    pub const NOT_CONFIGURED: i32 = 2;
    pub const CREATION_FAILED: i32 = 3;
    pub const PREVIOUS_NOT_FOUND: i32 = 4;
    pub const LISTING_FAILED: i32 = 5;
}

fn exit_code(error: &SnapshotError) -> i32 {
    match error {
        SnapshotError::SnapperNotConfigured { .. } => codes::NOT_CONFIGURED,
        SnapshotError::SnapshotCreationFailed { .. } => codes::CREATION_FAILED,
        SnapshotError::PreviousSnapshotNotFound(_) => codes::PREVIOUS_NOT_FOUND,
        SnapshotError::MalformedListing { .. } | SnapshotError::ListingFailed(_) => codes::LISTING_FAILED,
    }
}

fn init_logger(verbose: u8) {
    // RUST_LOG wins over -v
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        if e.use_stderr() {
            // clap's own exit code would collide with NOT_CONFIGURED
            let _ = e.print();
            std::process::exit(codes::USAGE);
        }
        e.exit()
    });
    init_logger(cli.global.verbose);

    let config = Config::from_args(&cli.global).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(codes::USAGE);
    });
    let snapper = Snapper::system(config);

    if let Err(e) = run(&snapper, cli.command) {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

fn run(snapper: &Snapper, command: Command) -> Result<(), SnapshotError> {
    match command {
        Command::Configured => {
            let name = &snapper.config().config_name;
            if snapper.configured() {
                println!("snapper configuration '{name}' is registered");
            } else {
                println!("snapper configuration '{name}' is not registered");
                std::process::exit(codes::NOT_CONFIGURED);
            }
        }
        Command::List(args) => {
            let snapshots = snapper.all()?;
            report::print_list(&snapshots, args.json);
        }
        Command::Show(args) => {
            // one listing for both lookups keeps the view consistent
            let snapshots = snapper.all()?;
            let Some(record) = snapshots.iter().find(|s| s.number == args.number) else {
                eprintln!("Snapshot {} not found", args.number);
                std::process::exit(codes::USAGE);
            };
            let previous = record
                .previous_number
                .and_then(|number| snapshots.iter().find(|s| s.number == number));
            report::print_record(record, previous, args.json);
        }
        Command::Pair(args) => {
            let number = snapper.resolve_pre(args.pre_num)?;
            println!("{number}");
        }
        Command::Create(args) => create(snapper, args)?,
    }

    Ok(())
}

fn create(snapper: &Snapper, args: CreateArgs) -> Result<(), SnapshotError> {
    let kind = SnapshotType::from(args.kind);
    if args.pre_num.is_some() && kind != SnapshotType::Post {
        eprintln!("--pre-num is only valid for post snapshots");
        std::process::exit(codes::USAGE);
    }

    let options = CreateOptions {
        cleanup: args.cleanup.as_deref().and_then(CleanupAlgorithm::parse),
        important: args.important,
    };

    let record = match kind {
        SnapshotType::Single => snapper.create_single(&args.description, &options)?,
        SnapshotType::Pre => snapper.create_pre(&args.description, &options)?,
        SnapshotType::Post => snapper.create_post(&args.description, args.pre_num, &options)?,
    };

    if args.json {
        println!("{}", report::json::render_one(&record));
    } else {
        println!("created {} snapshot #{}", record.kind, record.number);
    }

    Ok(())
}
